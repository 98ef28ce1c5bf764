use super::{id_hex, Entity};
use crate::utils::display_date;
use mongodb::bson::{self, oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Role> for Bson {
    fn from(role: Role) -> Self {
        Bson::String(role.as_str().to_string())
    }
}

/// Credential and employee record (`user`). Employees are a view of this collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    /// Argon2 PHC string; bcrypt for older accounts until their next login.
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub salary_date: Option<bson::DateTime>,
    pub hired_date: bson::DateTime,
}

impl Entity for User {
    const COLLECTION: &'static str = "user";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

/// Public shape of a user. Dates are `dd/mm/yyyy`; a missing salary date is `""`.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub phone: String,
    pub address: String,
    pub salary: f64,
    pub hired_date: String,
    pub salary_date: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: id_hex(user.id),
            username: user.username,
            role: user.role,
            phone: user.phone,
            address: user.address,
            salary: user.salary,
            hired_date: display_date(&user.hired_date.to_chrono()),
            salary_date: user
                .salary_date
                .map(|d| display_date(&d.to_chrono()))
                .unwrap_or_default(),
        }
    }
}
