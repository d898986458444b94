//! `google.api.http` method annotations.
//!
//! `prost-types` drops extensions while decoding descriptor options, so the
//! annotations are read from the raw request bytes with a skeleton message that
//! only keeps the path down to `MethodOptions`. Every other field is skipped
//! as unknown.

use std::collections::HashMap;

use prost::Message;

use crate::locations::{FileDescriptorProtoLocations, ServiceDescriptorProtoLocations};

/// Field number of the `google.api.http` extension on `MethodOptions`.
pub const HTTP_EXTENSION_TAG: u32 = 72295728;

/// Mirror of `google.api.HttpRule`.
#[derive(Clone, PartialEq, Message)]
pub struct HttpRule {
    #[prost(string, tag = "1")]
    pub selector: String,
    #[prost(string, tag = "7")]
    pub body: String,
    #[prost(string, tag = "12")]
    pub response_body: String,
    #[prost(message, repeated, tag = "11")]
    pub additional_bindings: Vec<HttpRule>,
    #[prost(oneof = "http_rule::Pattern", tags = "2, 3, 4, 5, 6, 8")]
    pub pattern: Option<http_rule::Pattern>,
}

pub mod http_rule {
    /// The HTTP verb and URL template a method is bound to.
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Pattern {
        #[prost(string, tag = "2")]
        Get(String),
        #[prost(string, tag = "3")]
        Put(String),
        #[prost(string, tag = "4")]
        Post(String),
        #[prost(string, tag = "5")]
        Delete(String),
        #[prost(string, tag = "6")]
        Patch(String),
        #[prost(message, tag = "8")]
        Custom(super::CustomHttpPattern),
    }
}

/// Mirror of `google.api.CustomHttpPattern`.
#[derive(Clone, PartialEq, Message)]
pub struct CustomHttpPattern {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub path: String,
}

impl HttpRule {
    /// The verb and URL template of the binding, if any pattern is set.
    pub fn verb_and_path(&self) -> Option<(&str, &str)> {
        use http_rule::Pattern;
        match self.pattern.as_ref()? {
            Pattern::Get(path) => Some(("GET", path)),
            Pattern::Put(path) => Some(("PUT", path)),
            Pattern::Post(path) => Some(("POST", path)),
            Pattern::Delete(path) => Some(("DELETE", path)),
            Pattern::Patch(path) => Some(("PATCH", path)),
            Pattern::Custom(custom) => Some((custom.kind.as_str(), custom.path.as_str())),
        }
    }
}

/// The HTTP rules declared in one file, keyed by the location path of their
/// method (`[6, service, 2, method]`).
#[derive(Debug, Default, Clone)]
pub struct HttpRules {
    by_path: HashMap<Vec<i32>, HttpRule>,
}

impl HttpRules {
    pub fn get(&self, path: &[i32]) -> Option<&HttpRule> {
        self.by_path.get(path)
    }

    pub fn insert(&mut self, service: usize, method: usize, rule: HttpRule) {
        self.by_path.insert(method_path(service, method), rule);
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

fn method_path(service: usize, method: usize) -> Vec<i32> {
    vec![
        FileDescriptorProtoLocations::SERVICE,
        service as i32,
        ServiceDescriptorProtoLocations::METHOD,
        method as i32,
    ]
}

/// Decodes the HTTP rules of every file in a serialized `CodeGeneratorRequest`.
/// The result has one entry per `proto_file`, in request order.
pub fn decode_http_rules(buf: &[u8]) -> Result<Vec<HttpRules>, prost::DecodeError> {
    let request = skeleton::Request::decode(buf)?;
    Ok(request
        .proto_file
        .into_iter()
        .map(|file| {
            let mut rules = HttpRules::default();
            for (service_idx, service) in file.service.into_iter().enumerate() {
                for (method_idx, method) in service.method.into_iter().enumerate() {
                    if let Some(http) = method.options.and_then(|options| options.http) {
                        rules.insert(service_idx, method_idx, http);
                    }
                }
            }
            rules
        })
        .collect())
}

/// Just enough of `descriptor.proto` and `plugin.proto` to reach the
/// `google.api.http` extension.
pub(crate) mod skeleton {
    use super::HttpRule;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Request {
        #[prost(message, repeated, tag = "15")]
        pub proto_file: Vec<File>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct File {
        #[prost(message, repeated, tag = "6")]
        pub service: Vec<Service>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Service {
        #[prost(message, repeated, tag = "2")]
        pub method: Vec<Method>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Method {
        #[prost(message, optional, tag = "4")]
        pub options: Option<MethodOptions>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct MethodOptions {
        #[prost(message, optional, tag = "72295728")]
        pub http: Option<HttpRule>,
    }
}
