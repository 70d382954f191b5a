pub type EntityId = i32;
pub type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Id value used by the export for "no reference"
pub const NO_REFERENCE: EntityId = 0;

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
