use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user profile: role, ucoin balance and display fields.
///
/// The balance is a whole number of ucoins and is only mutated inside
/// service-level transactions together with a ledger row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub role: Role,
    pub balance: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(default_value = "")]
    pub patronymic: String,
    #[sea_orm(nullable)]
    pub position: Option<String>,
    pub avatar_back_color: String,
    pub avatar_main_color: String,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Platform role. Administrators implicitly hold every lower role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "administrator")]
    Administrator,
}

impl Role {
    /// Role ordering used by the role middleware: admin > moderator > employee.
    pub fn rank(self) -> u8 {
        match self {
            Role::Employee => 0,
            Role::Moderator => 1,
            Role::Administrator => 2,
        }
    }

    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Moderator => "moderator",
            Role::Administrator => "administrator",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "employee" => Some(Role::Employee),
            "moderator" => Some(Role::Moderator),
            "administrator" => Some(Role::Administrator),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ranking_is_transitive() {
        assert!(Role::Administrator.at_least(Role::Moderator));
        assert!(Role::Administrator.at_least(Role::Employee));
        assert!(Role::Moderator.at_least(Role::Employee));
        assert!(!Role::Employee.at_least(Role::Moderator));
        assert!(!Role::Moderator.at_least(Role::Administrator));
    }

    #[test]
    fn role_parse_round_trips() {
        for role in [Role::Employee, Role::Moderator, Role::Administrator] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }
}
