use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use trail_portal::{
    AppConfig, AppState, MockImageStorage,
    models::{Difficulty, Image, Region, User, Walk, WalkDetail},
    query::WalkListQuery,
    repository::Repository,
};
use uuid::Uuid;

// --- In-Memory Repository ---

/// Stateful mock of the `Repository` trait. Handlers see the same contract as
/// with Postgres, so create-then-read flows can be asserted end to end
/// without a database.
pub struct MockRepo {
    pub regions: Mutex<Vec<Region>>,
    pub walks: Mutex<Vec<WalkDetail>>,
    pub difficulties: Vec<Difficulty>,
    pub users: Mutex<Vec<(User, Vec<String>)>>,
    pub images: Mutex<Vec<Image>>,
    /// When true, role assignment fails; the whole registration must then
    /// report failure and store no user row.
    pub fail_role_assignment: bool,
}

impl Default for MockRepo {
    fn default() -> Self {
        Self {
            regions: Mutex::new(vec![]),
            walks: Mutex::new(vec![]),
            difficulties: vec![
                Difficulty {
                    id: Uuid::from_u128(1),
                    name: "Easy".to_string(),
                },
                Difficulty {
                    id: Uuid::from_u128(2),
                    name: "Hard".to_string(),
                },
            ],
            users: Mutex::new(vec![]),
            images: Mutex::new(vec![]),
            fail_role_assignment: false,
        }
    }
}

impl MockRepo {
    pub fn with_regions(regions: Vec<Region>) -> Self {
        Self {
            regions: Mutex::new(regions),
            ..Self::default()
        }
    }

    pub fn with_walks(walks: Vec<WalkDetail>) -> Self {
        Self {
            walks: Mutex::new(walks),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn list_regions(&self) -> Result<Vec<Region>, sqlx::Error> {
        Ok(self.regions.lock().unwrap().clone())
    }

    async fn find_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error> {
        Ok(self
            .regions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create_region(&self, region: Region) -> Result<Region, sqlx::Error> {
        self.regions.lock().unwrap().push(region.clone());
        Ok(region)
    }

    async fn update_region(&self, id: Uuid, region: Region) -> Result<Option<Region>, sqlx::Error> {
        let mut regions = self.regions.lock().unwrap();
        match regions.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                *existing = region.clone();
                Ok(Some(region))
            }
            None => Ok(None),
        }
    }

    async fn delete_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error> {
        let mut regions = self.regions.lock().unwrap();
        match regions.iter().position(|r| r.id == id) {
            Some(index) => Ok(Some(regions.remove(index))),
            None => Ok(None),
        }
    }

    async fn list_walks(&self, query: &WalkListQuery) -> Result<Vec<WalkDetail>, sqlx::Error> {
        Ok(query.apply(self.walks.lock().unwrap().clone()))
    }

    async fn find_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error> {
        Ok(self
            .walks
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.walk.id == id)
            .cloned())
    }

    async fn create_walk(&self, walk: Walk) -> Result<WalkDetail, sqlx::Error> {
        let detail = self.resolve_detail(walk);
        self.walks.lock().unwrap().push(detail.clone());
        Ok(detail)
    }

    async fn update_walk(&self, id: Uuid, walk: Walk) -> Result<Option<WalkDetail>, sqlx::Error> {
        let detail = self.resolve_detail(walk);
        let mut walks = self.walks.lock().unwrap();
        match walks.iter_mut().find(|d| d.walk.id == id) {
            Some(existing) => {
                *existing = detail.clone();
                Ok(Some(detail))
            }
            None => Ok(None),
        }
    }

    async fn delete_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error> {
        let mut walks = self.walks.lock().unwrap();
        match walks.iter().position(|d| d.walk.id == id) {
            Some(index) => Ok(Some(walks.remove(index))),
            None => Ok(None),
        }
    }

    async fn list_difficulties(&self) -> Result<Vec<Difficulty>, sqlx::Error> {
        Ok(self.difficulties.clone())
    }

    async fn create_user_with_roles(
        &self,
        user: User,
        roles: &[String],
    ) -> Result<(), sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(u, _)| u.username == user.username) {
            return Err(sqlx::Error::RowNotFound);
        }
        // Mirrors the transactional contract: a failed role assignment
        // leaves no user row behind.
        if self.fail_role_assignment
            || roles.iter().any(|r| r != "Reader" && r != "Writer")
        {
            return Err(sqlx::Error::RowNotFound);
        }
        users.push((user, roles.to_vec()));
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.id == user_id)
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default())
    }

    async fn record_image(&self, image: Image) -> Result<Image, sqlx::Error> {
        self.images.lock().unwrap().push(image.clone());
        Ok(image)
    }
}

impl MockRepo {
    fn resolve_detail(&self, walk: Walk) -> WalkDetail {
        let region = self
            .regions
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == walk.region_id)
            .cloned()
            .unwrap_or_default();
        let difficulty = self
            .difficulties
            .iter()
            .find(|d| d.id == walk.difficulty_id)
            .cloned()
            .unwrap_or_default();
        WalkDetail {
            walk,
            region,
            difficulty,
        }
    }
}

// --- State & Fixture Helpers ---

/// Creates an AppState wired to the in-memory repository and mock storage.
pub fn test_state(repo: MockRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        storage: Arc::new(MockImageStorage::new()),
        config: AppConfig::default(),
    }
}

pub fn sample_region() -> Region {
    Region {
        id: Uuid::from_u128(10),
        code: "WGN".to_string(),
        name: "Wellington".to_string(),
        region_image_url: None,
    }
}

pub fn walk_named(name: &str, length_km: f64) -> WalkDetail {
    WalkDetail {
        walk: Walk {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            length_km,
            walk_image_url: None,
            region_id: Uuid::from_u128(10),
            difficulty_id: Uuid::from_u128(1),
        },
        region: sample_region(),
        difficulty: Difficulty {
            id: Uuid::from_u128(1),
            name: "Easy".to_string(),
        },
    }
}
