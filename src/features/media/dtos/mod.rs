mod media_dto;

pub use media_dto::{
    allowed_extension, content_type_for, MediaDetailDto, MediaResponseDto, SearchQuery,
    UploadMediaDto,
};
