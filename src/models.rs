use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth;

// --- Domain Models (Storage Shapes, Mapped to Database) ---

/// Region
///
/// A geographic region walks belong to. `code` is a fixed three-letter
/// abbreviation (e.g. "WGN").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct Region {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub region_image_url: Option<String>,
}

/// Difficulty
///
/// Seeded reference data; there is no endpoint that creates, updates or
/// deletes difficulties.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct Difficulty {
    pub id: Uuid,
    pub name: String,
}

/// Walk
///
/// A walking track. `region_id` and `difficulty_id` are foreign keys the
/// store enforces.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct Walk {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub length_km: f64,
    pub walk_image_url: Option<String>,
    pub region_id: Uuid,
    pub difficulty_id: Uuid,
}

/// WalkDetail
///
/// A walk joined with its region and difficulty rows, as read queries return
/// it. Write operations work with the bare `Walk`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkDetail {
    pub walk: Walk,
    pub region: Region,
    pub difficulty: Difficulty,
}

/// Image
///
/// Metadata for an uploaded binary. The binary itself lives under the content
/// root and is never persisted as a row field; `file_path` is the serving URL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, Default, PartialEq)]
pub struct Image {
    pub id: Uuid,
    pub file_name: String,
    pub file_description: Option<String>,
    pub file_extension: String,
    pub file_size_bytes: i64,
    pub file_path: String,
}

/// User
///
/// Canonical identity record. The password is stored as a one-way salted
/// hash; role names live in the `user_roles` join.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

// --- Wire Shapes (Output DTOs) ---

/// RegionDto
///
/// Wire representation of a Region. Field-for-field with the storage shape;
/// kept separate so the wire contract can evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub region_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyDto {
    pub id: Uuid,
    pub name: String,
}

/// WalkDto
///
/// Wire representation of a walk. The raw foreign keys are hidden; the
/// related region and difficulty are nested instead.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalkDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub length_in_km: f64,
    pub walk_image_url: Option<String>,
    pub region: RegionDto,
    pub difficulty: DifficultyDto,
}

/// ImageDto
///
/// Wire representation of an uploaded image: derived metadata and the serving
/// URL, never the binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub id: Uuid,
    pub file_name: String,
    pub file_description: Option<String>,
    pub file_extension: String,
    pub file_size_in_bytes: i64,
    pub file_url: String,
}

// --- Request Payloads (Input Schemas) ---

/// AddRegionRequest
///
/// Input payload for POST /regions. Validation runs across all fields before
/// any further processing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddRegionRequest {
    #[garde(length(min = 3, max = 3))]
    pub code: String,
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[garde(skip)]
    pub region_image_url: Option<String>,
}

/// UpdateRegionRequest
///
/// Input payload for PUT /regions/{id}. A full replacement, not a patch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegionRequest {
    #[garde(length(min = 3, max = 3))]
    pub code: String,
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[garde(skip)]
    pub region_image_url: Option<String>,
}

/// AddWalkRequest
///
/// Input payload for POST /walks. The referenced region and difficulty must
/// exist; the store enforces that.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddWalkRequest {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[garde(length(min = 1, max = 1000))]
    pub description: String,
    #[garde(range(min = 0.0))]
    pub length_in_km: f64,
    #[garde(skip)]
    pub walk_image_url: Option<String>,
    #[garde(skip)]
    pub region_id: Uuid,
    #[garde(skip)]
    pub difficulty_id: Uuid,
}

/// UpdateWalkRequest
///
/// Input payload for PUT /walks/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWalkRequest {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[garde(length(min = 1, max = 1000))]
    pub description: String,
    #[garde(range(min = 0.0))]
    pub length_in_km: f64,
    #[garde(skip)]
    pub walk_image_url: Option<String>,
    #[garde(skip)]
    pub region_id: Uuid,
    #[garde(skip)]
    pub difficulty_id: Uuid,
}

/// RegisterRequest
///
/// Input payload for POST /auth/register. The username doubles as the email
/// address; roles are assigned at registration time only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[garde(email)]
    pub username: String,
    #[garde(length(min = 6))]
    pub password: String,
    #[garde(length(min = 1), custom(known_roles))]
    pub roles: Vec<String>,
}

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(email)]
    pub username: String,
    #[garde(length(min = 1))]
    pub password: String,
}

/// LoginResponse
///
/// Output of a successful login: the bearer token to present on every
/// subsequent request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub jwt_token: String,
}

/// Only the two role names the authorization guard recognizes may be assigned.
fn known_roles(roles: &Vec<String>, _context: &()) -> garde::Result {
    for role in roles {
        if role != auth::ROLE_READER && role != auth::ROLE_WRITER {
            return Err(garde::Error::new(format!("unknown role: {role}")));
        }
    }
    Ok(())
}
