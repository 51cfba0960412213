mod forms;
mod paypal;

pub use forms::*;
pub use paypal::*;
