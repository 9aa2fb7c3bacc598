use donation::{DivisionRequest, FieldPath};
use geography::{DivisionName, RegionCode};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),

    /// A user edit of a text input.
    EditField { path: FieldPath, value: String },
    SelectRegion(RegionCode),
    SelectDivision(DivisionName),
    Submit,
    DismissNotice,

    // Executor completions
    RegionsLoaded(Vec<RegionCode>),
    DivisionsLoaded {
        request: DivisionRequest,
        divisions: Vec<DivisionName>,
    },
    GeographyFailed { lookup: String, message: String },
}
