/// What a screen (or one part of it) should render right now.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    /// Nothing requested yet.
    Idle,
    Loading,
    /// Loaded, and there is nothing to show.
    Empty,
    Success(T),
    Error(String),
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        UiState::Idle
    }
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> UiState<Vec<T>> {
    /// `Empty` for an empty list, `Success` otherwise.
    pub fn list(items: Vec<T>) -> Self {
        if items.is_empty() {
            UiState::Empty
        } else {
            UiState::Success(items)
        }
    }

    /// Items on screen; empty unless `Success`.
    pub fn items(&self) -> &[T] {
        self.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_distinguishes_empty() {
        assert_eq!(UiState::<Vec<u8>>::list(vec![]), UiState::Empty);
        assert_eq!(UiState::list(vec![1]), UiState::Success(vec![1]));
        assert_eq!(UiState::list(vec![1, 2]).items(), &[1, 2]);
        assert!(UiState::<Vec<u8>>::Loading.items().is_empty());
    }
}
