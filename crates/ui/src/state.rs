#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    EmptyQuiz,
    NotFound,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::EmptyQuiz => "This quiz has no questions yet.",
            ViewError::NotFound => "No results found for this quiz.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn from_result(result: Result<T, ViewError>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(err) => ViewState::Error(err),
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            ViewState::Error(_) => None,
        }
    }
}
