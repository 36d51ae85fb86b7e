mod tensor;

pub use tensor::{Placement, TensorRef};
