pub mod lexicon;
pub mod motion;
pub mod particles;
pub mod sampler;
pub mod story;
pub mod template;
pub mod view;
