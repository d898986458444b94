use std::rc::Rc;

use prost_types::FileDescriptorProto;

use crate::comments::{format_comment, CommentIndex};
use crate::http::{HttpRule, HttpRules};
use crate::locations::*;
use crate::naming::{IdentityFormatter, TypeNameFormatter};
use crate::outer_class::OuterClass;
use crate::syntax::Syntax;
use crate::{Error, Result};

/// A repeated part of the descriptor tree that the traversal can enter.
///
/// The nested variants carry the name of the enclosing message, which becomes
/// part of the qualified names of everything registered inside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind<'a> {
    Messages,
    Enums,
    Services,
    Fields,
    EnumValues,
    Methods,
    NestedMessages(&'a str),
    NestedEnums(&'a str),
    NestedOneofs(&'a str),
}

impl ListKind<'_> {
    fn field_number(&self) -> i32 {
        match self {
            ListKind::Messages => FileDescriptorProtoLocations::MESSAGE_TYPE,
            ListKind::Enums => FileDescriptorProtoLocations::ENUM_TYPE,
            ListKind::Services => FileDescriptorProtoLocations::SERVICE,
            ListKind::Fields => DescriptorLocations::FIELD,
            ListKind::EnumValues => EnumDescriptorLocations::VALUE,
            ListKind::Methods => ServiceDescriptorProtoLocations::METHOD,
            ListKind::NestedMessages(_) => DescriptorLocations::NESTED_TYPE,
            ListKind::NestedEnums(_) => DescriptorLocations::ENUM_TYPE,
            ListKind::NestedOneofs(_) => DescriptorLocations::ONEOF_DECL,
        }
    }

    fn enclosing_name(&self) -> Option<&str> {
        match *self {
            ListKind::NestedMessages(name)
            | ListKind::NestedEnums(name)
            | ListKind::NestedOneofs(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    List { nested: bool },
    Element,
}

/// Common information and traversal state for a single `FileDescriptorProto`.
///
/// The immutable half (packages, outer class, comments, syntax) is read by
/// every descriptor at construction. The traversal half tracks where in the
/// file the registration walk currently is: the location path used to find
/// comments, and the names of the messages enclosing the current declaration.
pub struct ProcessingContext {
    file_name: String,
    /// The protobuf package, e.g. `testPkg`.
    proto_package: String,
    /// The package generated code goes into: `java_package` if set, otherwise
    /// the protobuf package.
    target_package: String,
    outer_class: Rc<OuterClass>,
    comments: CommentIndex,
    syntax: Syntax,
    http_rules: HttpRules,
    type_name_formatter: Rc<dyn TypeNameFormatter>,
    common_package: Option<String>,

    path: Vec<i32>,
    outers: Vec<String>,
    scopes: Vec<Scope>,
}

impl ProcessingContext {
    pub fn new(file: &FileDescriptorProto, outer_class: OuterClass) -> Self {
        ProcessingContext {
            file_name: file.name().to_owned(),
            proto_package: file.package().to_owned(),
            target_package: target_package(file).to_owned(),
            outer_class: Rc::new(outer_class),
            comments: CommentIndex::from_source_info(file.source_code_info.as_ref()),
            syntax: Syntax::from(file.syntax.as_deref()),
            http_rules: HttpRules::default(),
            type_name_formatter: Rc::new(IdentityFormatter),
            common_package: None,
            path: Vec::new(),
            outers: Vec::new(),
            scopes: Vec::new(),
        }
    }

    pub fn with_http_rules(mut self, http_rules: HttpRules) -> Self {
        self.http_rules = http_rules;
        self
    }

    pub fn with_type_name_formatter(mut self, formatter: Rc<dyn TypeNameFormatter>) -> Self {
        self.type_name_formatter = formatter;
        self
    }

    pub fn with_common_package(mut self, common_package: Option<String>) -> Self {
        self.common_package = common_package;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn proto_package(&self) -> &str {
        &self.proto_package
    }

    pub fn target_package(&self) -> &str {
        &self.target_package
    }

    pub fn outer_class(&self) -> &Rc<OuterClass> {
        &self.outer_class
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn is_proto3_syntax(&self) -> bool {
        self.syntax.is_proto3()
    }

    pub fn type_name_formatter(&self) -> &Rc<dyn TypeNameFormatter> {
        &self.type_name_formatter
    }

    /// The longest package prefix shared by every file in the run.
    pub fn common_package(&self) -> Option<&str> {
        self.common_package.as_deref()
    }

    /// Names of the messages enclosing the current position, outermost first.
    pub fn outers(&self) -> &[String] {
        &self.outers
    }

    pub fn path(&self) -> &[i32] {
        &self.path
    }

    /// The comment at the current path, formatted as a Java string expression.
    pub fn comment_at_path(&self) -> String {
        format_comment(self.raw_comment())
    }

    pub fn raw_comment(&self) -> Option<&str> {
        self.comments.get(&self.path)
    }

    /// The `google.api.http` rule of the method at the current path.
    pub fn http_rule(&self) -> Option<&HttpRule> {
        self.http_rules.get(&self.path)
    }

    /// Name of the file generated for this `.proto`: the target package as a
    /// directory, then the plugin's outer class.
    pub fn output_file_name(&self, extension: &str) -> String {
        let class_file = format!("{}{}", self.outer_class.plugin_class(), extension);
        if self.target_package.is_empty() {
            class_file
        } else {
            format!("{}/{}", self.target_package.replace('.', "/"), class_file)
        }
    }

    // Path tracking. Comments live in `SourceCodeInfo` indexed by location
    // path, so the walk has to mirror that path as it goes.

    pub fn start_list(&mut self, kind: ListKind<'_>) {
        self.path.push(kind.field_number());
        let nested = match kind.enclosing_name() {
            Some(name) => {
                self.outers.push(name.to_owned());
                true
            }
            None => false,
        };
        self.scopes.push(Scope::List { nested });
    }

    pub fn end_list(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::List { nested }) => {
                if nested && self.outers.pop().is_none() {
                    return Err(Error::traversal("enclosing name stack is empty"));
                }
                self.pop_path()
            }
            Some(Scope::Element) => Err(Error::traversal("end of list inside a list element")),
            None => Err(Error::traversal("end of list without a matching start")),
        }
    }

    pub fn start_element(&mut self, idx: usize) {
        self.path.push(idx as i32);
        self.scopes.push(Scope::Element);
    }

    pub fn end_element(&mut self) -> Result<()> {
        match self.scopes.pop() {
            Some(Scope::Element) => self.pop_path(),
            Some(Scope::List { .. }) => Err(Error::traversal("end of list element inside a list")),
            None => Err(Error::traversal("end of list element without a matching start")),
        }
    }

    /// Runs `f` inside the list `kind`, ending the list afterwards even when
    /// `f` fails.
    pub fn with_list<T>(
        &mut self,
        kind: ListKind<'_>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.start_list(kind);
        let result = f(self);
        let end = self.end_list();
        let value = result?;
        end.map(|()| value)
    }

    /// Runs `f` on element `idx` of the current list.
    pub fn with_element<T>(
        &mut self,
        idx: usize,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.start_element(idx);
        let result = f(self);
        let end = self.end_element();
        let value = result?;
        end.map(|()| value)
    }

    fn pop_path(&mut self) -> Result<()> {
        self.path
            .pop()
            .map(|_| ())
            .ok_or_else(|| Error::traversal("location path is empty"))
    }
}

/// `java_package` if set, otherwise the protobuf package.
pub fn target_package(file: &FileDescriptorProto) -> &str {
    file.options
        .as_ref()
        .and_then(|options| options.java_package.as_deref())
        .unwrap_or_else(|| file.package())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prost_types::source_code_info::Location;
    use prost_types::{FileOptions, SourceCodeInfo};

    fn context() -> ProcessingContext {
        let file = FileDescriptorProto {
            name: Some("foo/widget_store.proto".to_owned()),
            package: Some("widgets".to_owned()),
            syntax: Some("proto3".to_owned()),
            options: Some(FileOptions {
                java_package: Some("com.example.widgets".to_owned()),
                ..Default::default()
            }),
            source_code_info: Some(SourceCodeInfo {
                location: vec![Location {
                    path: vec![4, 0, 3, 1],
                    leading_comments: Some(" A \"nested\" widget.\n".to_owned()),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        };
        ProcessingContext::new(&file, OuterClass::new(&file, |c| format!("{}Rest", c)))
    }

    #[test]
    fn test_file_information() {
        let ctx = context();
        assert_eq!("widgets", ctx.proto_package());
        assert_eq!("com.example.widgets", ctx.target_package());
        assert!(ctx.is_proto3_syntax());
        assert_eq!("WidgetStoreRest", ctx.outer_class().plugin_class());
        assert_eq!(
            "com/example/widgets/WidgetStoreRest.java",
            ctx.output_file_name(".java")
        );
    }

    #[test]
    fn test_comment_follows_path() {
        let mut ctx = context();
        ctx.start_list(ListKind::Messages);
        ctx.start_element(0);
        assert_eq!("\"\"", ctx.comment_at_path());
        ctx.start_list(ListKind::NestedMessages("Outer"));
        ctx.start_element(1);
        assert_eq!(&[4, 0, 3, 1], ctx.path());
        assert_eq!(&["Outer".to_owned()], ctx.outers());
        assert_eq!(r#""A \"nested\" widget.""#, ctx.comment_at_path());
        ctx.end_element().unwrap();
        ctx.end_list().unwrap();
        ctx.end_element().unwrap();
        ctx.end_list().unwrap();
        assert!(ctx.path().is_empty());
        assert!(ctx.outers().is_empty());
    }

    #[test]
    fn test_matched_pairs_restore_path_length() {
        let mut ctx = context();
        let kinds = [
            ListKind::Messages,
            ListKind::Enums,
            ListKind::Services,
            ListKind::Fields,
            ListKind::EnumValues,
            ListKind::Methods,
            ListKind::NestedMessages("A"),
            ListKind::NestedEnums("B"),
            ListKind::NestedOneofs("C"),
        ];
        for kind in kinds {
            let before = (ctx.path().len(), ctx.outers().len());
            ctx.with_list(kind, |ctx| {
                ctx.with_element(3, |ctx| {
                    assert_eq!(3, *ctx.path().last().unwrap());
                    Ok(())
                })
            })
            .unwrap();
            assert_eq!(before, (ctx.path().len(), ctx.outers().len()));
        }
    }

    #[test]
    fn test_scopes_are_closed_on_error() {
        let mut ctx = context();
        let result: Result<()> = ctx.with_list(ListKind::NestedMessages("A"), |ctx| {
            ctx.with_element(0, |_| {
                Err(Error::UnresolvedReference {
                    name: "Missing".to_owned(),
                })
            })
        });
        assert!(matches!(result, Err(Error::UnresolvedReference { .. })));
        assert!(ctx.path().is_empty());
        assert!(ctx.outers().is_empty());
    }

    #[test]
    fn test_unbalanced_pops_are_detected() {
        let mut ctx = context();
        assert!(matches!(ctx.end_list(), Err(Error::Traversal(_))));
        assert!(matches!(ctx.end_element(), Err(Error::Traversal(_))));

        ctx.start_list(ListKind::Fields);
        assert!(matches!(ctx.end_element(), Err(Error::Traversal(_))));

        ctx.start_list(ListKind::Fields);
        ctx.start_element(0);
        assert!(matches!(ctx.end_list(), Err(Error::Traversal(_))));
    }

    #[test]
    fn test_target_package_falls_back_to_proto_package() {
        let file = FileDescriptorProto {
            name: Some("a.proto".to_owned()),
            package: Some("pkg.sub".to_owned()),
            ..Default::default()
        };
        assert_eq!("pkg.sub", target_package(&file));
        let ctx = ProcessingContext::new(&file, OuterClass::new(&file, |c| c.to_owned()));
        assert!(!ctx.is_proto3_syntax());
        assert_eq!("pkg/sub/A.java", ctx.output_file_name(".java"));
    }
}
