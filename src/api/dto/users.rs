/*
 * Responsibility
 * - Admin user-management DTOs
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::links::Link;
use crate::repos::user_repo::UserWithRoleRow;

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Option<String>,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

#[derive(Debug, Serialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub assign_role: Link,
}

#[derive(Debug, Serialize)]
pub struct UserCollectionResponse {
    pub users: Vec<UserSummary>,
    #[serde(rename = "_links")]
    pub links: UserCollectionLinks,
}

#[derive(Debug, Serialize)]
pub struct UserCollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

impl UserCollectionResponse {
    pub fn new(rows: Vec<UserWithRoleRow>) -> Self {
        let users = rows
            .into_iter()
            .map(|row| UserSummary {
                links: UserLinks {
                    self_link: Link::new(format!("/admin/users/{}", row.id)),
                    assign_role: Link::new(format!("/admin/users/{}/role", row.id)),
                },
                id: row.id,
                username: row.username,
                role: row.role,
            })
            .collect();

        Self {
            users,
            links: UserCollectionLinks {
                self_link: Link::new("/admin/users"),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignRoleResponse {
    pub message: String,
    #[serde(rename = "_links")]
    pub links: AssignRoleLinks,
}

#[derive(Debug, Serialize)]
pub struct AssignRoleLinks {
    pub user: Link,
}

#[derive(Debug, Serialize)]
pub struct UserDeletedResponse {
    pub message: String,
    #[serde(rename = "_links")]
    pub links: UserDeletedLinks,
}

#[derive(Debug, Serialize)]
pub struct UserDeletedLinks {
    pub users: Link,
}
