// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Post-processing of the love.js entry page: a loading overlay, the script that
//! removes it once the page has loaded, and mobile/SEO meta tags.

use crate::config::BuildConfig;
use crate::error::PatchError;
use std::path::Path;
use strum::IntoEnumIterator as _;
use strum_macros::{Display, EnumIter};

/// Marks a document that has already been optimised. Carried at the top of the stylesheet block.
pub const SENTINEL: &str = "<!-- loveweb:optimized -->";

/// Blocks inserted into the page, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Insertion {
    Stylesheet,
    LoadingOverlay,
    RemovalScript,
    MetaTags,
}

/// Where an [`Insertion`] ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Placement {
    BeforeClosingHead,
    AfterOpeningHead,
    BeforeCanvas,
    AfterOpeningBody,
    BeforeClosingBody,
    Prepended,
    Appended,
    /// No anchor was found, so nothing was inserted.
    Skipped,
}

/// Each insertion paired with where it landed, in application order.
pub type Placements = Vec<(Insertion, Placement)>;

/// Result of patching one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The entry document does not exist; nothing was written.
    Missing,
    /// The document already carries [`SENTINEL`] and was left untouched.
    AlreadyPatched,
    Patched(Placements),
}

/// The rendered markup for each [`Insertion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchAssets {
    pub stylesheet: String,
    pub overlay: String,
    pub script: String,
    pub meta_tags: String,
}

impl PatchAssets {
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            stylesheet: format!("\n{SENTINEL}{LOADING_CSS}"),
            overlay: format!(
                r#"
<div id="love-loading">
  <div class="loading-spinner"></div>
  <div class="loading-text">Loading {}</div>
  <div class="loading-subtext">{}</div>
</div>
"#,
                escape_html(&config.title),
                escape_html(&config.loading_subtext)
            ),
            script: LOADING_SCRIPT.to_owned(),
            meta_tags: format!(
                r#"
<meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">
<meta name="description" content="{}">
<meta name="theme-color" content="{}">
"#,
                escape_html(&config.description),
                escape_html(&config.theme_color)
            ),
        }
    }

    fn markup(&self, insertion: Insertion) -> &str {
        match insertion {
            Insertion::Stylesheet => &self.stylesheet,
            Insertion::LoadingOverlay => &self.overlay,
            Insertion::RemovalScript => &self.script,
            Insertion::MetaTags => &self.meta_tags,
        }
    }
}

const LOADING_CSS: &str = r"
<style>
  #love-loading {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    z-index: 9999;
    color: white;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
  }
  #love-loading.hidden {
    display: none;
  }
  .loading-spinner {
    width: 50px;
    height: 50px;
    border: 4px solid rgba(255, 255, 255, 0.3);
    border-top-color: white;
    border-radius: 50%;
    animation: spin 1s linear infinite;
    margin-bottom: 20px;
  }
  @keyframes spin {
    to { transform: rotate(360deg); }
  }
  .loading-text {
    font-size: 18px;
    font-weight: 500;
    margin-top: 10px;
  }
  .loading-subtext {
    font-size: 14px;
    opacity: 0.8;
    margin-top: 5px;
  }
</style>
";

const LOADING_SCRIPT: &str = r"
<script>
  // Hide loading screen when game is ready
  window.addEventListener('load', function() {
    setTimeout(function() {
      var loading = document.getElementById('love-loading');
      if (loading) {
        loading.classList.add('hidden');
        setTimeout(function() {
          loading.style.display = 'none';
        }, 300);
      }
    }, 500);
  });
</script>
";

/// Applies every [`Insertion`] to `html`.
///
/// Returns `None` if the document already carries [`SENTINEL`].
pub fn patch_html(html: &str, assets: &PatchAssets) -> Option<(String, Placements)> {
    if html.contains(SENTINEL) {
        return None;
    }

    let mut html = html.to_owned();
    let placements = Insertion::iter()
        .map(|insertion| {
            let placement = insert(&mut html, insertion, assets.markup(insertion));
            if placement == Placement::Skipped {
                log::warn!("No anchor for {insertion}, leaving it out");
            } else {
                log::debug!("{insertion}: {placement}");
            }
            (insertion, placement)
        })
        .collect();

    Some((html, placements))
}

fn insert(html: &mut String, insertion: Insertion, markup: &str) -> Placement {
    let (index, placement) = match insertion {
        Insertion::Stylesheet | Insertion::MetaTags => {
            if let Some(i) = html.find("</head>") {
                (i, Placement::BeforeClosingHead)
            } else if let Some(i) = find_opening_tag_end(html, "head") {
                (i, Placement::AfterOpeningHead)
            } else {
                (0, Placement::Prepended)
            }
        }
        Insertion::LoadingOverlay => {
            if let Some(i) = find_tag_start(html, "canvas") {
                (i, Placement::BeforeCanvas)
            } else if let Some(i) = find_opening_tag_end(html, "body") {
                (i, Placement::AfterOpeningBody)
            } else {
                return Placement::Skipped;
            }
        }
        Insertion::RemovalScript => match html.find("</body>") {
            Some(i) => (i, Placement::BeforeClosingBody),
            None => (html.len(), Placement::Appended),
        },
    };

    html.insert_str(index, markup);
    placement
}

/// Byte offset of the first `<name` that opens a `name` element (not e.g. `<header` for `head`).
fn find_tag_start(html: &str, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut from = 0;
    while let Some(offset) = html[from..].find(&needle) {
        let start = from + offset;
        let after = start + needle.len();
        if html[after..]
            .chars()
            .next()
            .is_none_or(|c| c == '>' || c == '/' || c.is_ascii_whitespace())
        {
            return Some(start);
        }
        from = after;
    }
    None
}

/// Byte offset just past the `>` of the first opening `name` tag.
fn find_opening_tag_end(html: &str, name: &str) -> Option<usize> {
    let start = find_tag_start(html, name)?;
    html[start..].find('>').map(|i| start + i + 1)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Patches the document at `path` in place. A missing file is not an error.
pub async fn optimize_file(path: &Path, assets: &PatchAssets) -> Result<PatchOutcome, PatchError> {
    let html = match tokio::fs::read_to_string(path).await {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("{} not found, skipping optimization...", path.display());
            return Ok(PatchOutcome::Missing);
        }
        Err(source) => {
            return Err(PatchError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    log::info!("Optimizing {}...", path.display());

    let Some((patched, placements)) = patch_html(&html, assets) else {
        log::info!("{} is already optimized, leaving it unchanged", path.display());
        return Ok(PatchOutcome::AlreadyPatched);
    };

    tokio::fs::write(path, patched)
        .await
        .map_err(|source| PatchError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    log::info!("Optimization complete!");
    Ok(PatchOutcome::Patched(placements))
}
