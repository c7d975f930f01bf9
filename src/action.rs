use crate::system::process::SortColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    CycleSort,
    ReverseSort,
    SortBy(SortColumn),
    Refresh,
    None,
}
