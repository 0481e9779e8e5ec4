use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct UserModel {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String, // Salted hash, never the plaintext password
}

/// A user that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_model(self, id: i64) -> UserModel {
        UserModel {
            id,
            name: self.name,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}
