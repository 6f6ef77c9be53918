mod api_docs;

pub use api_docs::{
    ApiDoc, ApiEndpoint, ApiParameter, ApiResponse, HttpMethod, ParameterLocation, SubmitRequest,
};
