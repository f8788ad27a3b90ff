//! Folds free-text skill names onto canonical tokens.
//!
//! Two namespaces share one lookup shape:
//! - `Framework`: frameworks stay distinct (`django` stays `django`). Skill matching uses it.
//! - `Language`: frameworks fold onto the language they are written in (`django` → `python`).
//!   Search-query building uses it.
//!
//! Unknown text passes through lower-cased with whitespace trimmed and collapsed, so
//! `normalize` is total and idempotent. Tables are validated for collisions at startup
//! (`verify_tables`) and in tests.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::matching::MatchError;

/// Bump when either table changes meaning.
pub const SYNONYM_TABLE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Language,
    Framework,
}

type SynonymGroups = &'static [(&'static str, &'static [&'static str])];

const FRAMEWORK_SYNONYMS: SynonymGroups = &[
    ("javascript", &["js", "ecmascript", "es6", "java script"]),
    ("typescript", &["ts", "type script"]),
    ("python", &["py", "python3", "python 3"]),
    ("react", &["reactjs", "react.js", "react js"]),
    ("node", &["nodejs", "node.js", "node js"]),
    ("vue", &["vuejs", "vue.js", "vue js"]),
    ("angular", &["angularjs", "angular.js"]),
    ("nextjs", &["next.js", "next js"]),
    ("express", &["expressjs", "express.js"]),
    ("django", &["django rest framework", "drf"]),
    ("fastapi", &["fast api"]),
    ("spring", &["spring boot", "springboot"]),
    ("rails", &["ruby on rails", "ror"]),
    ("postgresql", &["postgres", "psql"]),
    ("mongodb", &["mongo", "mongo db"]),
    ("kubernetes", &["k8s", "kube"]),
    ("docker", &["containerization", "docker container"]),
    ("aws", &["amazon web services"]),
    ("gcp", &["google cloud", "google cloud platform"]),
    ("azure", &["microsoft azure"]),
    ("machine learning", &["ml", "machinelearning"]),
    ("artificial intelligence", &["ai"]),
    ("pytorch", &["torch"]),
    ("go", &["golang", "go lang"]),
    ("c++", &["cpp", "c plus plus"]),
    ("c#", &["csharp", "c sharp"]),
    ("rust", &["rust lang", "rustlang"]),
    ("shell", &["bash", "shell script"]),
];

const LANGUAGE_SYNONYMS: SynonymGroups = &[
    (
        "javascript",
        &[
            "js",
            "ecmascript",
            "es6",
            "java script",
            "node",
            "nodejs",
            "node.js",
            "node js",
            "react",
            "reactjs",
            "react.js",
            "react js",
            "vue",
            "vuejs",
            "vue.js",
            "vue js",
            "angular",
            "angularjs",
            "angular.js",
            "nextjs",
            "next.js",
            "express",
            "expressjs",
            "express.js",
            "jquery",
        ],
    ),
    ("typescript", &["ts", "type script"]),
    (
        "python",
        &[
            "py",
            "python3",
            "python 3",
            "django",
            "django rest framework",
            "drf",
            "flask",
            "fastapi",
            "fast api",
            "pandas",
            "numpy",
            "pytorch",
            "tensorflow",
        ],
    ),
    ("java", &["spring", "spring boot", "springboot", "openjdk"]),
    ("ruby", &["rails", "ruby on rails", "ror"]),
    ("php", &["laravel", "symfony"]),
    ("go", &["golang", "go lang"]),
    ("c++", &["cpp", "c plus plus"]),
    ("c#", &["csharp", "c sharp", ".net", "dotnet", "asp.net"]),
    ("rust", &["rust lang", "rustlang", "tokio", "actix"]),
    ("swift", &["swiftui"]),
    ("kotlin", &["ktor"]),
];

static FRAMEWORK_TABLE: LazyLock<SynonymTable> =
    LazyLock::new(|| SynonymTable::from_groups("framework", FRAMEWORK_SYNONYMS));

static LANGUAGE_TABLE: LazyLock<SynonymTable> =
    LazyLock::new(|| SynonymTable::from_groups("language", LANGUAGE_SYNONYMS));

#[derive(Debug, Clone, PartialEq)]
struct Collision {
    alias: String,
    first: &'static str,
    second: &'static str,
}

/// Alias → canonical lookup. Collisions are recorded instead of panicking so that
/// `verify` can report them through the normal error path.
#[derive(Debug)]
pub struct SynonymTable {
    name: &'static str,
    lookup: HashMap<String, &'static str>,
    collisions: Vec<Collision>,
}

impl SynonymTable {
    fn from_groups(name: &'static str, groups: SynonymGroups) -> Self {
        let mut lookup: HashMap<String, &'static str> = HashMap::new();
        let mut collisions = Vec::new();

        for &(canonical, aliases) in groups {
            // Each canonical token is its own alias, which keeps lookups idempotent.
            for alias in std::iter::once(canonical).chain(aliases.iter().copied()) {
                let key = clean(alias);
                match lookup.get(&key) {
                    Some(&existing) if existing != canonical => collisions.push(Collision {
                        alias: key,
                        first: existing,
                        second: canonical,
                    }),
                    Some(_) => {}
                    None => {
                        lookup.insert(key, canonical);
                    }
                }
            }
        }

        Self {
            name,
            lookup,
            collisions,
        }
    }

    pub fn verify(&self) -> Result<(), MatchError> {
        match self.collisions.first() {
            Some(collision) => Err(MatchError::SynonymCollision {
                table: self.name,
                alias: collision.alias.clone(),
                first: collision.first,
                second: collision.second,
            }),
            None => Ok(()),
        }
    }

    /// Unknown text comes back lower-cased and trimmed, inner spacing untouched.
    pub fn resolve(&self, text: &str) -> String {
        match self.lookup.get(&clean(text)) {
            Some(canonical) => (*canonical).to_string(),
            None => text.trim().to_lowercase(),
        }
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }
}

fn table(namespace: Namespace) -> &'static SynonymTable {
    match namespace {
        Namespace::Framework => &FRAMEWORK_TABLE,
        Namespace::Language => &LANGUAGE_TABLE,
    }
}

/// Canonical skill token for matching (framework namespace).
pub fn normalize(text: &str) -> String {
    normalize_in(Namespace::Framework, text)
}

pub fn normalize_in(namespace: Namespace, text: &str) -> String {
    table(namespace).resolve(text)
}

/// Fails if either table maps one alias to two canonical tokens.
pub fn verify_tables() -> Result<(), MatchError> {
    FRAMEWORK_TABLE.verify()?;
    LANGUAGE_TABLE.verify()
}

/// Entry counts per table, for startup logging.
pub fn table_sizes() -> (usize, usize) {
    (FRAMEWORK_TABLE.len(), LANGUAGE_TABLE.len())
}

/// Lookup key: lower-cased, with runs of whitespace collapsed to one space.
fn clean(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased words of `text` joined by single spaces and padded with a space on each
/// side, so `contains_term` can match whole words and multi-word phrases.
pub fn word_haystack(text: &str) -> String {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    format!(" {} ", words.join(" "))
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.contains(&format!(" {term} "))
}
