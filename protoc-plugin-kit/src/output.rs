use std::fmt;

/// Everything that goes into the generated file for one `.proto`.
///
/// The rendered text is a starting point: plugins usually run it through a
/// real formatter in [`Generator::format_source`](crate::Generator::format_source).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContent {
    pub plugin_name: String,
    pub imports: String,
    /// The `.proto` file the content was generated from.
    pub proto_source_name: String,
    pub package: String,
    pub outer_class_name: String,
    pub message_code: Vec<String>,
    pub enum_code: Vec<String>,
    pub service_code: Vec<String>,
}

impl FileContent {
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn blocks(&self) -> impl Iterator<Item = &str> {
        self.message_code
            .iter()
            .chain(&self.enum_code)
            .chain(&self.service_code)
            .map(String::as_str)
    }
}

impl fmt::Display for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "// Generated by the {} plugin. DO NOT EDIT!",
            self.plugin_name
        )?;
        writeln!(f, "// source: {}", self.proto_source_name)?;
        writeln!(f)?;
        if !self.package.is_empty() {
            writeln!(f, "package {};", self.package)?;
            writeln!(f)?;
        }
        if !self.imports.trim().is_empty() {
            writeln!(f, "{}", self.imports.trim_end())?;
            writeln!(f)?;
        }

        writeln!(f, "public final class {} {{", self.outer_class_name)?;
        writeln!(f, "    private {}() {{}}", self.outer_class_name)?;
        for block in self.blocks() {
            writeln!(f)?;
            for line in block.trim_end().lines() {
                if line.trim().is_empty() {
                    writeln!(f)?;
                } else {
                    writeln!(f, "    {}", line)?;
                }
            }
        }
        writeln!(f, "}}")
    }
}
