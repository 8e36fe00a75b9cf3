mod service_dto;

pub use service_dto::{
    CreateServiceDto, ExecutorSummaryDto, ServiceDetailDto, ServicePhotoDto, ServiceSummaryDto,
    UpdateServiceDto,
};
