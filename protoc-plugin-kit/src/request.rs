use multimap::MultiMap;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::FileDescriptorProto;

use crate::http::{decode_http_rules, HttpRules};
use crate::Result;

/// A decoded `CodeGeneratorRequest`, with the `google.api.http` annotations
/// that `prost-types` cannot keep.
#[derive(Debug, Clone, Default)]
pub struct PluginRequest {
    request: CodeGeneratorRequest,
    /// One entry per `proto_file`.
    http_rules: Vec<HttpRules>,
    parameters: Parameters,
}

impl PluginRequest {
    pub fn decode(buf: &[u8]) -> Result<PluginRequest> {
        let request = CodeGeneratorRequest::decode(buf)?;
        let http_rules = decode_http_rules(buf)?;
        Ok(PluginRequest::with_http_rules(request, http_rules))
    }

    /// Wraps an already decoded request. No file has any HTTP rules.
    pub fn new(request: CodeGeneratorRequest) -> PluginRequest {
        PluginRequest::with_http_rules(request, Vec::new())
    }

    pub fn with_http_rules(request: CodeGeneratorRequest, http_rules: Vec<HttpRules>) -> Self {
        let parameters = Parameters::parse(request.parameter());
        PluginRequest {
            request,
            http_rules,
            parameters,
        }
    }

    pub fn request(&self) -> &CodeGeneratorRequest {
        &self.request
    }

    /// Every file protoc loaded, dependencies before dependents.
    pub fn files(&self) -> &[FileDescriptorProto] {
        &self.request.proto_file
    }

    /// The HTTP rules of the file at `idx` in [`files`](Self::files).
    pub fn http_rules(&self, idx: usize) -> HttpRules {
        self.http_rules.get(idx).cloned().unwrap_or_default()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// The `--<plugin>_opt` values protoc passes in `CodeGeneratorRequest::parameter`,
/// e.g. `flag,key=value,key=other`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: MultiMap<String, String>,
}

impl Parameters {
    pub fn parse(parameter: &str) -> Parameters {
        let mut values = MultiMap::new();
        for entry in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match entry.split_once('=') {
                Some((key, value)) => values.insert(key.trim().to_owned(), value.trim().to_owned()),
                None => values.insert(entry.to_owned(), String::new()),
            }
        }
        Parameters { values }
    }

    /// Whether `key` was passed, with or without a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The first value of `key`. Flags have an empty value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every value of `key`, in the order given.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.values
            .get_vec(key)
            .map(|values| values.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
