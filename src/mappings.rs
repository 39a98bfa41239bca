//! Explicit storage↔wire conversions, one pure function per entity pair.
//! Kept declarative and total over the shared fields so a mismatch is a
//! compile error rather than a silent drop.

use uuid::Uuid;

use crate::models::{
    AddRegionRequest, AddWalkRequest, Difficulty, DifficultyDto, Image, ImageDto, Region,
    RegionDto, UpdateRegionRequest, UpdateWalkRequest, Walk, WalkDetail, WalkDto,
};

// --- Region ---

pub fn region_to_dto(region: Region) -> RegionDto {
    RegionDto {
        id: region.id,
        code: region.code,
        name: region.name,
        region_image_url: region.region_image_url,
    }
}

pub fn region_from_dto(dto: RegionDto) -> Region {
    Region {
        id: dto.id,
        code: dto.code,
        name: dto.name,
        region_image_url: dto.region_image_url,
    }
}

pub fn region_from_add(id: Uuid, req: AddRegionRequest) -> Region {
    Region {
        id,
        code: req.code,
        name: req.name,
        region_image_url: req.region_image_url,
    }
}

pub fn region_from_update(id: Uuid, req: UpdateRegionRequest) -> Region {
    Region {
        id,
        code: req.code,
        name: req.name,
        region_image_url: req.region_image_url,
    }
}

// --- Difficulty ---

pub fn difficulty_to_dto(difficulty: Difficulty) -> DifficultyDto {
    DifficultyDto {
        id: difficulty.id,
        name: difficulty.name,
    }
}

pub fn difficulty_from_dto(dto: DifficultyDto) -> Difficulty {
    Difficulty {
        id: dto.id,
        name: dto.name,
    }
}

// --- Walk ---

pub fn walk_to_dto(detail: WalkDetail) -> WalkDto {
    WalkDto {
        id: detail.walk.id,
        name: detail.walk.name,
        description: detail.walk.description,
        length_in_km: detail.walk.length_km,
        walk_image_url: detail.walk.walk_image_url,
        region: region_to_dto(detail.region),
        difficulty: difficulty_to_dto(detail.difficulty),
    }
}

/// Reconstitutes the storage shape from the wire shape; the foreign keys come
/// back out of the nested relations.
pub fn walk_from_dto(dto: WalkDto) -> Walk {
    Walk {
        id: dto.id,
        name: dto.name,
        description: dto.description,
        length_km: dto.length_in_km,
        walk_image_url: dto.walk_image_url,
        region_id: dto.region.id,
        difficulty_id: dto.difficulty.id,
    }
}

pub fn walk_from_add(id: Uuid, req: AddWalkRequest) -> Walk {
    Walk {
        id,
        name: req.name,
        description: req.description,
        length_km: req.length_in_km,
        walk_image_url: req.walk_image_url,
        region_id: req.region_id,
        difficulty_id: req.difficulty_id,
    }
}

pub fn walk_from_update(id: Uuid, req: UpdateWalkRequest) -> Walk {
    Walk {
        id,
        name: req.name,
        description: req.description,
        length_km: req.length_in_km,
        walk_image_url: req.walk_image_url,
        region_id: req.region_id,
        difficulty_id: req.difficulty_id,
    }
}

// --- Image ---

pub fn image_to_dto(image: Image) -> ImageDto {
    ImageDto {
        id: image.id,
        file_name: image.file_name,
        file_description: image.file_description,
        file_extension: image.file_extension,
        file_size_in_bytes: image.file_size_bytes,
        file_url: image.file_path,
    }
}
