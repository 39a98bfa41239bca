use crate::{
    AppState,
    credentials::CredentialService,
    error::{ApiError, FieldViolation},
    mappings,
    models::{
        AddRegionRequest, AddWalkRequest, DifficultyDto, Image, ImageDto, LoginRequest,
        LoginResponse, RegionDto, RegisterRequest, UpdateRegionRequest, UpdateWalkRequest, WalkDto,
    },
    query::{WalkListParams, WalkListQuery},
};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use garde::Validate;
use uuid::Uuid;

use crate::auth;

// Upload constraints for the image endpoint.
const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];
const MAX_IMAGE_SIZE_BYTES: usize = 10 * 1024 * 1024;

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates an account with its role assignments. Validation
/// covers every field before the credential service runs; a failed
/// registration reports failure and stores nothing.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<&'static str, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    let credentials = CredentialService::new(state.repo.clone());
    credentials
        .register(&payload.username, &payload.password, &payload.roles)
        .await?;

    Ok("User was registered! Please login.")
}

/// login
///
/// [Public Route] Verifies the credentials and mints the bearer token the
/// caller presents on every subsequent request. Unknown username and wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    let credentials = CredentialService::new(state.repo.clone());
    let Some(user) = credentials
        .verify(&payload.username, &payload.password)
        .await?
    else {
        return Err(ApiError::BadRequest(
            "Incorrect username or password".to_string(),
        ));
    };

    let roles = credentials.roles_of(&user).await?;
    let jwt_token = auth::issue_token(&state.config, &user.username, roles)?;

    Ok(Json(LoginResponse { jwt_token }))
}

// --- Region Handlers ---

/// get_regions
///
/// [Reader Route] Lists all regions.
pub async fn get_regions(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegionDto>>, ApiError> {
    let regions = state.repo.list_regions().await?;
    Ok(Json(regions.into_iter().map(mappings::region_to_dto).collect()))
}

/// get_region
///
/// [Reader Route] Retrieves a single region by id.
pub async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegionDto>, ApiError> {
    match state.repo.find_region(id).await? {
        Some(region) => Ok(Json(mappings::region_to_dto(region))),
        None => Err(ApiError::NotFound),
    }
}

/// create_region
///
/// [Writer Route] Creates a region and answers 201 with a Location header
/// pointing at the new resource.
pub async fn create_region(
    State(state): State<AppState>,
    Json(payload): Json<AddRegionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    let region = mappings::region_from_add(Uuid::new_v4(), payload);
    let created = state.repo.create_region(region).await?;
    let dto = mappings::region_to_dto(created);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/regions/{}", dto.id))],
        Json(dto),
    ))
}

/// update_region
///
/// [Writer Route] Full replacement of an existing region. A nonexistent id is
/// 404, never an insert.
pub async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRegionRequest>,
) -> Result<Json<RegionDto>, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    match state
        .repo
        .update_region(id, mappings::region_from_update(id, payload))
        .await?
    {
        Some(region) => Ok(Json(mappings::region_to_dto(region))),
        None => Err(ApiError::NotFound),
    }
}

/// delete_region
///
/// [Writer Route] Hard delete; the deleted record is echoed back to the
/// caller.
pub async fn delete_region(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegionDto>, ApiError> {
    match state.repo.delete_region(id).await? {
        Some(region) => Ok(Json(mappings::region_to_dto(region))),
        None => Err(ApiError::NotFound),
    }
}

// --- Walk Handlers ---

/// get_walks
///
/// [Reader Route] Lists walks with optional filtering, sorting and
/// pagination. Unrecognized filter/sort field names are ignored; pagination
/// bounds are validated, never clamped.
pub async fn get_walks(
    State(state): State<AppState>,
    Query(params): Query<WalkListParams>,
) -> Result<Json<Vec<WalkDto>>, ApiError> {
    params
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    let query = WalkListQuery::from_params(params);
    let walks = state.repo.list_walks(&query).await?;
    Ok(Json(walks.into_iter().map(mappings::walk_to_dto).collect()))
}

/// get_walk
///
/// [Reader Route] Retrieves a single walk with its region and difficulty.
pub async fn get_walk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalkDto>, ApiError> {
    match state.repo.find_walk(id).await? {
        Some(detail) => Ok(Json(mappings::walk_to_dto(detail))),
        None => Err(ApiError::NotFound),
    }
}

/// create_walk
///
/// [Writer Route] Creates a walk. The store enforces that the referenced
/// region and difficulty exist.
pub async fn create_walk(
    State(state): State<AppState>,
    Json(payload): Json<AddWalkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    let walk = mappings::walk_from_add(Uuid::new_v4(), payload);
    let created = state.repo.create_walk(walk).await?;
    let dto = mappings::walk_to_dto(created);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/walks/{}", dto.id))],
        Json(dto),
    ))
}

/// update_walk
///
/// [Writer Route] Full replacement of an existing walk.
pub async fn update_walk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWalkRequest>,
) -> Result<Json<WalkDto>, ApiError> {
    payload
        .validate()
        .map_err(|report| ApiError::from_report(&report))?;

    match state
        .repo
        .update_walk(id, mappings::walk_from_update(id, payload))
        .await?
    {
        Some(detail) => Ok(Json(mappings::walk_to_dto(detail))),
        None => Err(ApiError::NotFound),
    }
}

/// delete_walk
///
/// [Writer Route] Hard delete; echoes the deleted record.
pub async fn delete_walk(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalkDto>, ApiError> {
    match state.repo.delete_walk(id).await? {
        Some(detail) => Ok(Json(mappings::walk_to_dto(detail))),
        None => Err(ApiError::NotFound),
    }
}

// --- Difficulty Handlers ---

/// get_difficulties
///
/// [Reader Route] Lists the seeded difficulty levels.
pub async fn get_difficulties(
    State(state): State<AppState>,
) -> Result<Json<Vec<DifficultyDto>>, ApiError> {
    let difficulties = state.repo.list_difficulties().await?;
    Ok(Json(
        difficulties
            .into_iter()
            .map(mappings::difficulty_to_dto)
            .collect(),
    ))
}

// --- Image Handlers ---

/// upload_image
///
/// [Writer Route] Accepts a multipart form with fields `file`, `fileName` and
/// optional `fileDescription`, writes the binary under the content root and
/// records its derived metadata plus serving URL. The binary itself is never
/// stored as a row field.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageDto>, ApiError> {
    let mut file_bytes: Option<axum::body::Bytes> = None;
    let mut original_name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                original_name = field.file_name().map(ToString::to_string);
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("unreadable file field: {e}")))?,
                );
            }
            "fileName" => {
                file_name = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("unreadable fileName field: {e}"))
                })?);
            }
            "fileDescription" => {
                file_description = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("unreadable fileDescription field: {e}"))
                })?);
            }
            _ => {}
        }
    }

    // Collect the complete violation set before responding.
    let mut violations = Vec::new();
    let extension = original_name
        .as_deref()
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(std::ffi::OsStr::to_str)
        .map(|ext| format!(".{}", ext.to_lowercase()));

    if file_bytes.is_none() {
        violations.push(FieldViolation::new("file", "a file is required"));
    }
    if file_name.as_deref().is_none_or(str::is_empty) {
        violations.push(FieldViolation::new("fileName", "a file name is required"));
    }
    match &extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => violations.push(FieldViolation::new(
            "file",
            "unsupported file extension, expected .jpg, .jpeg or .png",
        )),
    }
    if let Some(bytes) = &file_bytes {
        if bytes.len() > MAX_IMAGE_SIZE_BYTES {
            violations.push(FieldViolation::new(
                "file",
                "file size cannot be more than 10MB",
            ));
        }
    }
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    // The checks above guarantee these are present.
    let bytes = file_bytes.unwrap_or_default();
    let file_name = file_name.unwrap_or_default();
    let extension = extension.unwrap_or_default();

    let file_path = state
        .storage
        .save(&file_name, &extension, &bytes)
        .await
        .map_err(ApiError::Internal)?;

    let image = Image {
        id: Uuid::new_v4(),
        file_name,
        file_description,
        file_extension: extension,
        file_size_bytes: bytes.len() as i64,
        file_path,
    };
    let recorded = state.repo.record_image(image).await?;

    Ok(Json(mappings::image_to_dto(recorded)))
}
