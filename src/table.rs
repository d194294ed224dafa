//! User table view model - ordered users exposed as rows and columns

use crate::models::User;

/// Fixed column labels, in display order
pub const COLUMNS: [&str; 4] = ["Username", "First Name", "Last Name", "Bio"];

/// Ordered sequence of users backing the table widget
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserTable {
    users: Vec<User>,
}

impl UserTable {
    pub fn new(users: Vec<User>) -> Self {
        UserTable { users }
    }

    pub fn row_count(&self) -> usize {
        self.users.len()
    }

    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    pub fn column_name(&self, column: usize) -> Option<&'static str> {
        COLUMNS.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Cell text at (row, column), `None` when either is out of range
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        let user = self.users.get(row)?;
        match column {
            0 => Some(&user.username),
            1 => Some(&user.firstname),
            2 => Some(&user.lastname),
            3 => Some(user.bio()),
            _ => None,
        }
    }

    pub fn user_at(&self, row: usize) -> Option<&User> {
        self.users.get(row)
    }

    /// Row currently holding the user with this id
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Replace the whole sequence
    pub fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    pub fn clear(&mut self) {
        self.users.clear();
    }

    /// Positional delete; later rows shift up by one
    pub fn remove_row(&mut self, row: usize) -> Option<User> {
        if row < self.users.len() {
            Some(self.users.remove(row))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            firstname: format!("{}-first", username),
            lastname: format!("{}-last", username),
            bio: None,
            avatar: None,
            date_of_birth: None,
            is_admin: None,
            article_count: None,
        }
    }

    #[test]
    fn test_cells_map_to_user_fields() {
        let mut alice = user(1, "alice");
        alice.bio = Some("hello".to_string());
        let table = UserTable::new(vec![alice, user(2, "bob")]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.column_name(2), Some("Last Name"));
        assert_eq!(table.column_name(4), None);
        assert_eq!(table.cell(0, 0), Some("alice"));
        assert_eq!(table.cell(0, 1), Some("alice-first"));
        assert_eq!(table.cell(0, 3), Some("hello"));
        assert_eq!(table.cell(1, 3), Some(""));
        assert_eq!(table.cell(1, 4), None);
        assert_eq!(table.cell(2, 0), None);
    }

    #[test]
    fn test_remove_row_is_positional() {
        let mut table = UserTable::new(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        let removed = table.remove_row(1).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(table.users().iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(table.position_of(3), Some(1));
        assert!(table.remove_row(2).is_none());
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_set_users_replaces_everything() {
        let mut table = UserTable::new(vec![user(1, "a")]);
        table.set_users(vec![user(5, "e"), user(6, "f")]);
        assert_eq!(table.user_at(0).map(|u| u.id), Some(5));
        table.clear();
        assert!(table.is_empty());
    }
}
