//! Enumerations for TUI state management.

/// Top-level views reachable from the sidebar.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Todos,
    Stats,
    Categories,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Todos, View::Stats, View::Categories, View::Settings];

    pub fn label(self) -> &'static str {
        match self {
            View::Todos => "Todos",
            View::Stats => "Stats",
            View::Categories => "Categories",
            View::Settings => "Settings",
        }
    }

    fn index(self) -> usize {
        View::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Browse,
    QuickAdd,
    Rename,
    AddCategory,
    Confirm,
    Help,
}

impl AppState {
    /// States that route keystrokes into the input field.
    pub fn is_text_entry(self) -> bool {
        matches!(self, AppState::QuickAdd | AppState::Rename | AppState::AddCategory)
    }
}

/// A destructive action waiting for y/n.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PendingAction {
    DeleteTask { id: String, title: String },
    DeleteCategory { id: String, name: String },
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::DeleteTask { title, .. } => {
                format!("Delete '{title}' and all of its sub-tasks")
            }
            PendingAction::DeleteCategory { name, .. } => format!("Delete category '{name}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cycle_both_ways() {
        assert_eq!(View::Todos.next(), View::Stats);
        assert_eq!(View::Settings.next(), View::Todos);
        assert_eq!(View::Todos.prev(), View::Settings);
    }
}
