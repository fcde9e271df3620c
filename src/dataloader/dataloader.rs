use crate::err::NetworkError;
use crate::util::Float;

/// Dataset collaborator surface the training core consumes: iterate the
/// elements and fetch the input/expected vectors of one element.
pub trait DataLoader {
    fn elements(&self) -> usize;

    fn input(&self, index: usize) -> Result<&[Float], NetworkError>;
    fn expected(&self, index: usize) -> Result<&[Float], NetworkError>;

    fn inputs_length(&self) -> usize;
    fn outputs_length(&self) -> usize;
}
