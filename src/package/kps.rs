//! Reader for the author-facing package project file.
//!
//! Only the handful of elements the package needs are read; everything else
//! in the project file is ignored.
use super::{PackageAuthor, PackageInfo, PackageLanguage, PackageLexicalModel};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// A file listed by the project, as referenced from the project's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpsFile {
    pub source: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpsProject {
    pub info: PackageInfo,
    pub files: Vec<KpsFile>,
    pub lexical_models: Vec<PackageLexicalModel>,
}

pub fn parse_kps(text: &str) -> Result<KpsProject> {
    let xml = strip_comments(text);
    let package = element(&xml, "Package")?
        .ok_or_else(|| anyhow!("missing <Package> root element"))?;

    let info = match element(package.inner, "Info")? {
        Some(info) => parse_info(info.inner)?,
        None => PackageInfo::default(),
    };

    let mut files = Vec::new();
    if let Some(list) = element(package.inner, "Files")? {
        for file in elements(list.inner, "File")? {
            let source = child_text(file.inner, "Name")?
                .ok_or_else(|| anyhow!("package <File> entry without <Name>"))?;
            let description = child_text(file.inner, "Description")?.unwrap_or_default();
            files.push(KpsFile {
                source,
                description,
            });
        }
    }

    let mut lexical_models = Vec::new();
    if let Some(list) = element(package.inner, "LexicalModels")? {
        for model in elements(list.inner, "LexicalModel")? {
            let id = child_text(model.inner, "ID")?
                .ok_or_else(|| anyhow!("<LexicalModel> entry without <ID>"))?;
            let name = child_text(model.inner, "Name")?;
            let mut languages = Vec::new();
            if let Some(langs) = element(model.inner, "Languages")? {
                for language in elements(langs.inner, "Language")? {
                    let lang_id = attribute(language.attrs, "ID")?
                        .filter(|lang_id| !lang_id.is_empty())
                        .ok_or_else(|| anyhow!("<Language> in {id} without ID attribute"))?;
                    let name = Some(unescape(language.inner.trim())).filter(|n| !n.is_empty());
                    languages.push(PackageLanguage { id: lang_id, name });
                }
            }
            lexical_models.push(PackageLexicalModel {
                id,
                name,
                languages,
            });
        }
    }

    Ok(KpsProject {
        info,
        files,
        lexical_models,
    })
}

fn parse_info(xml: &str) -> Result<PackageInfo> {
    let author = match element(xml, "Author")? {
        Some(author) => {
            let name = unescape(author.inner.trim());
            let email = attribute(author.attrs, "URL")?
                .and_then(|url| url.strip_prefix("mailto:").map(str::to_string))
                .filter(|email| !email.is_empty());
            (!name.is_empty() || email.is_some()).then_some(PackageAuthor { name, email })
        }
        None => None,
    };
    Ok(PackageInfo {
        name: child_text(xml, "Name")?,
        author,
        version: child_text(xml, "Version")?,
        copyright: child_text(xml, "Copyright")?,
        website: child_text(xml, "WebSite")?,
        description: child_text(xml, "Description")?,
    })
}

#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    attrs: &'a str,
    inner: &'a str,
}

/// Compiled element and attribute patterns keyed by their source text.
static PATTERN_CACHE: OnceLock<Mutex<HashMap<String, Regex>>> = OnceLock::new();

fn cached_regex(pattern: String) -> Result<Regex> {
    let mut cache = PATTERN_CACHE
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = cache.get(&pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(&pattern).with_context(|| format!("compile pattern {pattern}"))?;
    cache.insert(pattern, re.clone());
    Ok(re)
}

fn element_regex(tag: &str) -> Result<Regex> {
    let tag = regex::escape(tag);
    cached_regex(format!(
        r"(?s)<{tag}(\s[^>]*?)?(?:/>|>(.*?)</{tag}\s*>)"
    ))
}

fn elements<'a>(xml: &'a str, tag: &str) -> Result<Vec<Element<'a>>> {
    let re = element_regex(tag)?;
    Ok(re
        .captures_iter(xml)
        .map(|caps| Element {
            attrs: caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
            inner: caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
        })
        .collect())
}

fn element<'a>(xml: &'a str, tag: &str) -> Result<Option<Element<'a>>> {
    Ok(elements(xml, tag)?.into_iter().next())
}

/// Trimmed, unescaped text of the first `<tag>` child; `None` when absent or blank.
fn child_text(xml: &str, tag: &str) -> Result<Option<String>> {
    Ok(element(xml, tag)?
        .map(|el| unescape(el.inner.trim()))
        .filter(|text| !text.is_empty()))
}

fn attribute(attrs: &str, name: &str) -> Result<Option<String>> {
    let re = cached_regex(format!(r#"\b{}\s*=\s*"([^"]*)""#, regex::escape(name)))?;
    Ok(re
        .captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape(m.as_str())))
}

fn strip_comments(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("regex for XML comments"));
    re.replace_all(text, "").into_owned()
}

fn unescape(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#x[0-9a-fA-F]+);")
            .expect("regex for XML entities")
    });
    re.replace_all(text, |caps: &regex::Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "amp" => Some('&'),
            _ => {
                let code = match entity.strip_prefix("#x") {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => entity[1..].parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            }
        };
        decoded
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_info_files_and_models() {
        let project = parse_kps(
            r#"<Package>
  <!-- <Info><Name>commented out</Name></Info> -->
  <System><FileVersion>12.0</FileVersion></System>
  <Info>
    <Name URL="">Tom &amp; Jerry</Name>
    <Copyright>© 2026</Copyright>
    <Author URL="mailto:t@example.org">Tom</Author>
    <WebSite URL="https://example.org">example.org</WebSite>
  </Info>
  <Files>
    <File>
      <Name>..\build\a.b.c.model.js</Name>
      <Description>Lexical model a.b.c.model.js</Description>
      <FileType>.model.js</FileType>
    </File>
  </Files>
  <LexicalModels>
    <LexicalModel>
      <Name>ABC</Name>
      <ID>a.b.c</ID>
      <Languages>
        <Language ID="b">Bee</Language>
        <Language ID="b-latn"/>
      </Languages>
    </LexicalModel>
  </LexicalModels>
</Package>"#,
        )
        .expect("parse");

        assert_eq!(project.info.name.as_deref(), Some("Tom & Jerry"));
        assert_eq!(project.info.copyright.as_deref(), Some("© 2026"));
        assert_eq!(project.info.website.as_deref(), Some("example.org"));
        assert!(project.info.version.is_none());
        assert_eq!(
            project.info.author,
            Some(PackageAuthor {
                name: "Tom".to_string(),
                email: Some("t@example.org".to_string()),
            })
        );
        assert_eq!(
            project.files,
            vec![KpsFile {
                source: "..\\build\\a.b.c.model.js".to_string(),
                description: "Lexical model a.b.c.model.js".to_string(),
            }]
        );
        let model = &project.lexical_models[0];
        assert_eq!(model.id, "a.b.c");
        assert_eq!(model.name.as_deref(), Some("ABC"));
        let ids: Vec<&str> = model.languages.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "b-latn"]);
        assert_eq!(model.languages[0].name.as_deref(), Some("Bee"));
        assert!(model.languages[1].name.is_none());
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(parse_kps("<Other/>").is_err());
    }

    #[test]
    fn file_without_name_is_an_error() {
        let err = parse_kps(
            "<Package><Files><File><Description>x</Description></File></Files></Package>",
        )
            .expect_err("nameless file");
        assert!(err.to_string().contains("<Name>"));
    }

    #[test]
    fn unescape_handles_numeric_entities() {
        assert_eq!(unescape("&#65;&#x42;&unknown;&lt;"), "AB&unknown;<");
    }

    #[test]
    fn element_patterns_are_compiled_once() {
        let first = element_regex("Copyright").expect("first");
        let second = element_regex("Copyright").expect("second");
        assert_eq!(first.as_str(), second.as_str());

        let cache = PATTERN_CACHE
            .get()
            .expect("cache initialized")
            .lock()
            .expect("cache lock");
        let copies = cache
            .keys()
            .filter(|pattern| pattern.contains("<Copyright"))
            .count();
        assert_eq!(copies, 1);
    }
}
