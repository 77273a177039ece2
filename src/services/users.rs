use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::entities::user;
use crate::entities::user_profile::{self, Role};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

const DEFAULT_AVATAR_BACK: &str = "#000000";
const DEFAULT_AVATAR_MAIN: &str = "#FDB4FF";
const SEARCH_RESULT_LIMIT: u64 = 3;
const SEARCH_TOKEN_TRUNCATION: usize = 6;

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    /// Empty or missing username is generated from the name fields.
    #[serde(default)]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[serde(default)]
    pub patronymic: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub balance: i32,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub user_name: String,
}

/// Profile payload safe to show to other users.
#[derive(Debug, Serialize)]
pub struct PublicUserInfo {
    pub user_id: Uuid,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub patronymic: String,
    pub position: Option<String>,
    pub role: Role,
    pub avatar_back_color: String,
    pub avatar_main_color: String,
}

impl PublicUserInfo {
    pub fn from_profile(profile: &user_profile::Model) -> Self {
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            patronymic: profile.patronymic.clone(),
            position: profile.position.clone(),
            role: profile.role,
            avatar_back_color: profile.avatar_back_color.clone(),
            avatar_main_color: profile.avatar_main_color.clone(),
        }
    }
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Register a user account with its profile. The temporary password is
    /// derived from the username ("tempPas_" prefix) and must be changed by
    /// the user.
    #[instrument(skip(self))]
    pub async fn create_user(&self, input: CreateUserInput) -> Result<CreatedUser, ServiceError> {
        input.validate()?;

        let username = match input.username.as_deref().filter(|u| !u.is_empty()) {
            Some(explicit) => explicit.to_string(),
            None => {
                let first = input.first_name.to_lowercase();
                let last_initial = first_char(&input.last_name);
                let patronymic_initial = first_char(&input.patronymic);
                let parts: Vec<&str> = [
                    first.as_str(),
                    last_initial.as_str(),
                    patronymic_initial.as_str(),
                ]
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect();
                self.generate_username(&parts).await?
            }
        };

        let password_hash = crate::auth::hash_password(&format!("tempPas_{}", username))
            .map_err(|e| ServiceError::HashError(e.to_string()))?;

        let txn = self.db.begin().await?;

        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let account = user::ActiveModel {
            id: Set(user_id),
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account.insert(&txn).await?;

        let profile = user_profile::ActiveModel {
            user_id: Set(user_id),
            role: Set(Role::Employee),
            balance: Set(input.balance.max(0)),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            patronymic: Set(input.patronymic.clone()),
            position: Set(input.position.clone()),
            avatar_back_color: Set(DEFAULT_AVATAR_BACK.to_string()),
            avatar_main_color: Set(DEFAULT_AVATAR_MAIN.to_string()),
            created_at: Set(now),
        };
        let profile = profile.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::UserRegistered(user_id))
            .await;

        Ok(CreatedUser {
            user_id,
            username,
            user_name: profile.full_name(),
        })
    }

    /// Build a unique username from transliterated name parts. Collisions
    /// get a numeric suffix based on how many usernames share the prefix.
    /// Not safe under concurrent imports; acceptable for an admin-only
    /// operation.
    pub async fn generate_username(&self, parts: &[&str]) -> Result<String, ServiceError> {
        let base = transliterate(&parts.join("_"));

        let same_prefix = user::Entity::find()
            .filter(user::Column::Username.starts_with(&base))
            .count(&*self.db)
            .await?;

        if same_prefix == 0 {
            Ok(base)
        } else {
            Ok(format!("{}_{}", base, same_prefix))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<user_profile::Model, ServiceError> {
        user_profile::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User profile {} not found", user_id)))
    }

    #[instrument(skip(self))]
    pub async fn get_balance(&self, user_id: Uuid) -> Result<i32, ServiceError> {
        Ok(self.get_profile(user_id).await?.balance)
    }

    /// Name-based prefix search. One token matches either name; two tokens
    /// match (first, last) or (last, first), each token truncated to 6
    /// characters. Returns at most 3 profiles, never the requester's own.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        requester_id: Uuid,
        query: &str,
    ) -> Result<Vec<PublicUserInfo>, ServiceError> {
        let tokens: Vec<String> = query.split_whitespace().map(title_case).collect();

        let condition = match tokens.as_slice() {
            [] => {
                return Err(ServiceError::ValidationError(
                    "Search query is empty".to_string(),
                ))
            }
            [single] => Condition::any()
                .add(user_profile::Column::FirstName.starts_with(single))
                .add(user_profile::Column::LastName.starts_with(single)),
            [a, b] => {
                let a = truncate_chars(a, SEARCH_TOKEN_TRUNCATION);
                let b = truncate_chars(b, SEARCH_TOKEN_TRUNCATION);
                Condition::any()
                    .add(
                        Condition::all()
                            .add(user_profile::Column::FirstName.starts_with(&a))
                            .add(user_profile::Column::LastName.starts_with(&b)),
                    )
                    .add(
                        Condition::all()
                            .add(user_profile::Column::FirstName.starts_with(&b))
                            .add(user_profile::Column::LastName.starts_with(&a)),
                    )
            }
            _ => {
                return Err(ServiceError::ValidationError(
                    "Too many search terms; a name is only a first and last name".to_string(),
                ))
            }
        };

        let profiles = user_profile::Entity::find()
            .filter(condition)
            .filter(user_profile::Column::UserId.ne(requester_id))
            .limit(SEARCH_RESULT_LIMIT)
            .all(&*self.db)
            .await?;

        Ok(profiles.iter().map(PublicUserInfo::from_profile).collect())
    }

    /// All users currently holding the moderator role.
    #[instrument(skip(self))]
    pub async fn list_moderators(&self) -> Result<Vec<PublicUserInfo>, ServiceError> {
        let profiles = user_profile::Entity::find()
            .filter(user_profile::Column::Role.eq(Role::Moderator))
            .all(&*self.db)
            .await?;
        Ok(profiles.iter().map(PublicUserInfo::from_profile).collect())
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, user_id: Uuid, role: Role) -> Result<(), ServiceError> {
        let profile = self.get_profile(user_id).await?;
        let mut active: user_profile::ActiveModel = profile.into();
        active.role = Set(role);
        active.update(&*self.db).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mut active: user::ActiveModel = account.into();
        active.active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::UserDeactivated(user_id))
            .await;
        Ok(())
    }
}

pub fn first_char(s: &str) -> String {
    s.chars().next().map(|c| c.to_string()).unwrap_or_default()
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Cyrillic-to-Latin transliteration for username generation. Characters
/// outside the table pass through unchanged.
pub fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match translit_char(c) {
            Some(mapped) => out.push_str(mapped),
            None => out.push(c),
        }
    }
    out
}

fn translit_char(c: char) -> Option<&'static str> {
    let mapped = match c {
        'а' => "a", 'б' => "b", 'в' => "v", 'г' => "g", 'д' => "d",
        'е' => "e", 'ё' => "yo", 'ж' => "zh", 'з' => "z", 'и' => "i",
        'й' => "y", 'к' => "k", 'л' => "l", 'м' => "m", 'н' => "n",
        'о' => "o", 'п' => "p", 'р' => "r", 'с' => "s", 'т' => "t",
        'у' => "u", 'ф' => "f", 'х' => "kh", 'ц' => "ts", 'ч' => "ch",
        'ш' => "sh", 'щ' => "shch", 'ъ' => "", 'ы' => "y", 'ь' => "",
        'э' => "e", 'ю' => "yu", 'я' => "ya",
        'А' => "A", 'Б' => "B", 'В' => "V", 'Г' => "G", 'Д' => "D",
        'Е' => "E", 'Ё' => "Yo", 'Ж' => "Zh", 'З' => "Z", 'И' => "I",
        'Й' => "Y", 'К' => "K", 'Л' => "L", 'М' => "M", 'Н' => "N",
        'О' => "O", 'П' => "P", 'Р' => "R", 'С' => "S", 'Т' => "T",
        'У' => "U", 'Ф' => "F", 'Х' => "Kh", 'Ц' => "Ts", 'Ч' => "Ch",
        'Ш' => "Sh", 'Щ' => "Shch", 'Ъ' => "", 'Ы' => "Y", 'Ь' => "",
        'Э' => "E", 'Ю' => "Yu", 'Я' => "Ya",
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_cyrillic_names() {
        assert_eq!(transliterate("иванов_П_С"), "ivanov_P_S");
        assert_eq!(transliterate("щербаков"), "shcherbakov");
        assert_eq!(transliterate("smith"), "smith");
    }

    #[test]
    fn title_case_normalizes_tokens() {
        assert_eq!(title_case("iVAN"), "Ivan");
        assert_eq!(title_case("petrov"), "Petrov");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("Konstantin", 6), "Konsta");
        assert_eq!(truncate_chars("Ли", 6), "Ли");
    }
}
