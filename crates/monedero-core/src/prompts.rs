//! Prompt templates for the generation service
//!
//! Every template ships inside the binary (`prompts/*.md`). A file named `<id>.md` in
//! the override directory (`<data_local_dir>/monedero/prompts/overrides/`) replaces the
//! embedded copy. Overrides are read on every `get`, so edits apply to the next request.
//!
//! Template format: YAML frontmatter (`id`, `version`), then a `# System` and a `# User`
//! section. `{{name}}` is replaced by a variable; `{{#if name}}...{{/if}}` is kept only
//! when `name` is non-blank.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

const FRONTMATTER_FENCE: &str = "---";
const IF_OPEN: &str = "{{#if ";
const IF_CLOSE: &str = "{{/if}}";

mod embedded {
    pub const CATEGORIZE_MOVEMENTS: &str =
        include_str!("../../../prompts/categorize_movements.md");
    pub const ANALYZE_LEDGER: &str = include_str!("../../../prompts/analyze_ledger.md");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Bucket movements into the category taxonomy (JSON output)
    CategorizeMovements,
    /// Free-text answer about the ledger
    AnalyzeLedger,
}

impl PromptId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CategorizeMovements => "categorize_movements",
            Self::AnalyzeLedger => "analyze_ledger",
        }
    }

    pub fn all() -> &'static [PromptId] {
        &[Self::CategorizeMovements, Self::AnalyzeLedger]
    }

    pub fn parse(id: &str) -> Option<PromptId> {
        Self::all().iter().copied().find(|p| p.as_str() == id)
    }

    fn embedded(&self) -> &'static str {
        match self {
            Self::CategorizeMovements => embedded::CATEGORIZE_MOVEMENTS,
            Self::AnalyzeLedger => embedded::ANALYZE_LEDGER,
        }
    }

    fn file_name(&self) -> String {
        format!("{}.md", self.as_str())
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    pub version: u32,
}

/// Where a loaded prompt came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    Embedded,
    Override(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    /// Body after the frontmatter
    pub content: String,
    pub source: PromptSource,
}

impl Prompt {
    pub fn is_override(&self) -> bool {
        matches!(self.source, PromptSource::Override(_))
    }

    pub fn system_section(&self) -> Option<&str> {
        section(&self.content, "System")
    }

    pub fn user_section(&self) -> Option<&str> {
        section(&self.content, "User")
    }

    /// Render the whole body
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(&self.content, vars)
    }

    /// Render the `# User` section, or the whole body when it has no sections
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(self.user_section().unwrap_or(&self.content), vars)
    }
}

/// Summary row for `monedero prompts list`
#[derive(Debug, Clone)]
pub struct PromptInfo {
    pub id: PromptId,
    /// 0 when the override file cannot be parsed
    pub version: u32,
    pub source: PromptSource,
}

#[derive(Debug, Clone)]
pub struct PromptLibrary {
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Embedded prompts plus the per-user override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Embedded prompts only (tests, reproducible runs)
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    pub fn get(&self, id: PromptId) -> Result<Prompt> {
        match self.existing_override(id) {
            Some(path) => {
                let text = fs::read_to_string(&path).map_err(|e| {
                    Error::Parse(format!("Failed to read prompt {}: {}", path.display(), e))
                })?;
                let (metadata, content) = parse_prompt(&text)?;
                Ok(Prompt {
                    metadata,
                    content,
                    source: PromptSource::Override(path),
                })
            }
            None => {
                let (metadata, content) = parse_prompt(id.embedded())?;
                Ok(Prompt {
                    metadata,
                    content,
                    source: PromptSource::Embedded,
                })
            }
        }
    }

    pub fn has_override(&self, id: PromptId) -> bool {
        self.existing_override(id).is_some()
    }

    pub fn list(&self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let source = match self.existing_override(id) {
                    Some(path) => PromptSource::Override(path),
                    None => PromptSource::Embedded,
                };
                let version = self.get(id).map(|p| p.metadata.version).unwrap_or(0);
                PromptInfo {
                    id,
                    version,
                    source,
                }
            })
            .collect()
    }

    fn existing_override(&self, id: PromptId) -> Option<PathBuf> {
        let path = self.override_dir.as_ref()?.join(id.file_name());
        path.exists().then_some(path)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// `<data_local_dir>/monedero/prompts/overrides`
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("monedero").join("prompts").join("overrides"))
}

fn parse_prompt(text: &str) -> Result<(PromptMetadata, String)> {
    let after_open = text
        .trim_start()
        .strip_prefix(FRONTMATTER_FENCE)
        .ok_or_else(|| Error::Parse("Prompt must start with a --- frontmatter block".into()))?;

    let (frontmatter, body) = after_open
        .split_once(FRONTMATTER_FENCE)
        .ok_or_else(|| Error::Parse("Prompt frontmatter is missing its closing ---".into()))?;

    let metadata = serde_yaml::from_str::<PromptMetadata>(frontmatter)
        .map_err(|e| Error::Parse(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.trim().to_string()))
}

/// Text under a `# <name>` heading, up to the next top-level heading
fn section<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let heading = format!("# {}", name);
    let mut offset = 0;
    let mut start = None;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_end();
        match start {
            None if trimmed == heading => start = Some(offset + line.len()),
            Some(begin) if trimmed.starts_with("# ") => {
                return Some(content[begin..offset].trim());
            }
            _ => {}
        }
        offset += line.len();
    }

    start.map(|begin| content[begin..].trim())
}

/// Resolve conditionals, then substitute variables in one pass
///
/// Values that themselves contain `{{...}}` are inserted verbatim.
fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    substitute(&resolve_conditionals(template, vars), vars)
}

fn substitute(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find("}}") else {
            out.push_str(tail);
            return out;
        };
        let placeholder = &tail[..close + 2];
        match vars.get(&placeholder[2..close]) {
            Some(value) => out.push_str(value),
            None => out.push_str(placeholder),
        }
        rest = &tail[close + 2..];
    }

    out.push_str(rest);
    out
}

fn resolve_conditionals(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find(IF_OPEN) {
        let tail = &rest[open + IF_OPEN.len()..];
        let Some((name, block_and_rest)) = tail.split_once("}}") else {
            break;
        };
        let Some((block, after)) = block_and_rest.split_once(IF_CLOSE) else {
            break;
        };

        out.push_str(&rest[..open]);
        if vars.get(name.trim()).is_some_and(|v| !v.trim().is_empty()) {
            out.push_str(block);
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt_frontmatter_and_body() {
        let text = "\n---\nid: resumen\nversion: 3\n---\n\n# System\nSé breve.\n\n# User\n{{pregunta}}\n";

        let (metadata, body) = parse_prompt(text).unwrap();
        assert_eq!(metadata.id, "resumen");
        assert_eq!(metadata.version, 3);
        assert!(body.starts_with("# System"));
        assert!(body.ends_with("{{pregunta}}"));
    }

    #[test]
    fn test_parse_prompt_requires_frontmatter() {
        assert!(matches!(parse_prompt("# User\nhola"), Err(Error::Parse(_))));
        assert!(matches!(
            parse_prompt("---\nid: x\nversion: 1\n"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            parse_prompt("---\nid: x\n---\nsin versión"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_sections() {
        let content = "# System\nReglas.\nMás reglas.\n\n# User\nPregunta: {{q}}";

        assert_eq!(section(content, "System"), Some("Reglas.\nMás reglas."));
        assert_eq!(section(content, "User"), Some("Pregunta: {{q}}"));
        assert_eq!(section(content, "Assistant"), None);
    }

    #[test]
    fn test_substitute_single_pass() {
        let mut vars = HashMap::new();
        vars.insert("a", "{{b}}");
        vars.insert("b", "B");

        assert_eq!(substitute("x {{a}} y {{b}}", &vars), "x {{b}} y B");
        assert_eq!(substitute("keep {{unknown}}", &vars), "keep {{unknown}}");
        assert_eq!(substitute("open {{ only", &vars), "open {{ only");
    }

    #[test]
    fn test_conditional_blocks() {
        let template = "Inicio{{#if notes}}\nNotas: {{notes}}{{/if}}\nFin";

        let mut vars = HashMap::new();
        vars.insert("notes", "solo enero");
        assert_eq!(
            render_template(template, &vars),
            "Inicio\nNotas: solo enero\nFin"
        );

        vars.insert("notes", "   ");
        assert_eq!(render_template(template, &vars), "Inicio\nFin");

        assert_eq!(render_template(template, &HashMap::new()), "Inicio\nFin");
    }

    #[test]
    fn test_unclosed_conditional_is_left_alone() {
        let template = "a {{#if x}} b";
        assert_eq!(resolve_conditionals(template, &HashMap::new()), template);
    }

    #[test]
    fn test_embedded_prompts_load() {
        let lib = PromptLibrary::embedded_only();

        for id in PromptId::all() {
            let prompt = lib.get(*id).unwrap();
            assert_eq!(prompt.source, PromptSource::Embedded);
            assert_eq!(prompt.metadata.id, id.as_str());
            assert!(prompt.system_section().is_some());
            assert!(prompt.user_section().is_some());
        }
    }

    #[test]
    fn test_override_replaces_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("analyze_ledger.md"),
            "---\nid: analyze_ledger\nversion: 7\n---\n\n# User\nCustom: {{instruction}}",
        )
        .unwrap();

        let lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(lib.has_override(PromptId::AnalyzeLedger));
        assert!(!lib.has_override(PromptId::CategorizeMovements));

        let prompt = lib.get(PromptId::AnalyzeLedger).unwrap();
        assert!(prompt.is_override());
        assert_eq!(prompt.metadata.version, 7);
        assert_eq!(prompt.system_section(), None);

        let mut vars = HashMap::new();
        vars.insert("instruction", "resumen");
        assert_eq!(prompt.render_user(&vars), "Custom: resumen");

        let listed = lib.list();
        assert_eq!(listed.len(), 2);
        assert!(listed
            .iter()
            .any(|p| p.id == PromptId::AnalyzeLedger && p.version == 7 && p.source != PromptSource::Embedded));
    }

    #[test]
    fn test_broken_override_lists_version_zero() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("categorize_movements.md"), "sin frontmatter").unwrap();

        let lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(matches!(
            lib.get(PromptId::CategorizeMovements),
            Err(Error::Parse(_))
        ));

        let info = lib
            .list()
            .into_iter()
            .find(|p| p.id == PromptId::CategorizeMovements)
            .unwrap();
        assert_eq!(info.version, 0);
    }

    #[test]
    fn test_prompt_id_parse() {
        assert_eq!(
            PromptId::parse("categorize_movements"),
            Some(PromptId::CategorizeMovements)
        );
        assert_eq!(PromptId::parse("nope"), None);
        assert_eq!(PromptId::AnalyzeLedger.to_string(), "analyze_ledger");
    }
}
