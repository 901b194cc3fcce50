/// One page of a paginated collection as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// 1-based page number.
    pub number: u32,
    pub items: Vec<T>,
    pub is_last: bool,
}

impl<T> Page<T> {
    pub fn new(number: u32, items: Vec<T>, is_last: bool) -> Self {
        Self {
            number,
            items,
            is_last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Overwrite the collection with the page.
    Replace,
    /// Append the page after the items already loaded.
    Append,
}
