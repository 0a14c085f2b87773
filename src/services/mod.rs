pub mod completion;
pub mod tutor;
