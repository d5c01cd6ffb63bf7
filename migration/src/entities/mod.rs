pub mod lookup_request;

pub use lookup_request::Entity as LookupRequestEntity;
