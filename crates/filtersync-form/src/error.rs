//! Form error types

use thiserror::Error;

use crate::container::ControlId;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown control: {0}")]
    UnknownControl(ControlId),

    #[error("Control {control} has no option at index {index}")]
    OptionOutOfRange { control: ControlId, index: usize },

    #[error("Control {0} cannot be checked")]
    NotCheckable(ControlId),

    #[error("Invalid form markup: {0}")]
    Markup(String),
}
