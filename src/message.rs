//! # Merge Message Synthesis
//!
//! Builds the commit message recorded for each imported sub-repository.
//!
//! ## Process
//!
//! 1.  **Previous tag**: in update mode, the history of the destination
//!     directory is scanned for an earlier import of the same upstream line,
//!     matched by the tag's revision token. Initial imports have none.
//!
//! 2.  **Range**: with a previous tag the message covers
//!     `previous..target`; without one it lists only the newest
//!     [`HISTORY_LIMIT`](crate::defaults::HISTORY_LIMIT) commits of the
//!     target tag and says so.
//!
//! 3.  **Composition**: a subject naming the tag and branch, the commit
//!     count, and one indented line per upstream commit.
//!
//! The message lives in memory. [`MessageFile`] materializes it for
//! `git commit --file` under a unique name and removes it when dropped, so
//! no failure path leaves a stale message behind for the next run.

use std::fmt;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::catalog::SubRepo;
use crate::config::{Mode, RunConfig, Tag};
use crate::defaults::HISTORY_LIMIT;
use crate::error::Result;
use crate::git::{Git, HistoryRange};
use crate::interrupt::PendingFiles;

/// File name prefix of commit message files.
pub const MESSAGE_FILE_PREFIX: &str = "merge-message-";

/// Indentation of each upstream commit line.
pub const LOG_INDENT: &str = "        ";

/// Last line of a message whose history was cut short.
pub const TRUNCATION_MARKER: &str = "        ...";

/// Note explaining a cut-short history.
pub const TRUNCATION_NOTE: &str =
    "This is an initial merge, all commit changes will not be written fully.";

/// A commit message ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeMessage {
    pub subject: String,
    pub body: String,
}

impl MergeMessage {
    /// Prefixes the subject with the sub-repository name, kernel style.
    pub fn for_subrepo(mut self, name: &str) -> Self {
        self.subject = format!("{}: {}", name, self.subject);
        self
    }

    pub fn render(&self) -> String {
        format!("{}\n\n{}\n", self.subject, self.body)
    }
}

impl fmt::Display for MergeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Finds the tag of an earlier import among commit subjects, newest first.
///
/// The first subject containing the revision token wins; within it, the
/// first word containing the token (quotes stripped) is taken as the tag.
pub fn find_previous_tag<S: AsRef<str>>(subjects: &[S], tag: &Tag) -> Option<String> {
    let revision = tag.revision();
    let subject = subjects
        .iter()
        .map(|s| AsRef::<str>::as_ref(s))
        .find(|s| s.contains(revision))?;

    subject
        .split_whitespace()
        .map(|word| word.trim_matches(|c| c == '\'' || c == '"'))
        .find(|word| word.contains(revision))
        .map(str::to_string)
}

/// Picks the history range for a message.
pub fn resolve_range(previous: Option<String>, tag: &Tag) -> HistoryRange {
    match previous {
        Some(previous) => HistoryRange::Between {
            previous,
            target: tag.as_str().to_string(),
        },
        None => HistoryRange::Recent {
            target: tag.as_str().to_string(),
            limit: HISTORY_LIMIT,
        },
    }
}

/// Composes the message text.
///
/// A truncated range is an initial import of that history and is labelled
/// as such; a tagged range is a regular merge.
pub fn compose(
    range: &HistoryRange,
    tag: &Tag,
    branch: &str,
    count: usize,
    subjects: &[String],
) -> MergeMessage {
    let truncated = range.is_truncated();
    let subject = if truncated {
        format!("Initial tag '{}' into {}", tag, branch)
    } else {
        format!("Merge tag '{}' into {}", tag, branch)
    };

    let mut lines = Vec::with_capacity(subjects.len() + 3);
    if truncated {
        lines.push(TRUNCATION_NOTE.to_string());
    }
    lines.push(format!("Changes in tag '{}': ({} commits)", tag, count));
    lines.extend(subjects.iter().map(|s| format!("{}{}", LOG_INDENT, s)));
    if truncated {
        lines.push(TRUNCATION_MARKER.to_string());
    }

    MergeMessage {
        subject,
        body: lines.join("\n"),
    }
}

/// Queries history and composes the message for one sub-repository.
pub fn synthesize(
    git: &Git,
    config: &RunConfig,
    repo: &SubRepo,
    branch: &str,
) -> Result<MergeMessage> {
    let previous = match config.mode {
        Mode::Initial => None,
        Mode::Update => {
            let subjects = git.subjects_touching(&repo.prefix())?;
            find_previous_tag(&subjects, &config.tag)
        }
    };
    match &previous {
        Some(previous) => log::info!("Previous import of '{}' was '{}'", repo.name, previous),
        None if config.mode == Mode::Update => log::warn!(
            "No earlier import of '{}' found for revision '{}', listing recent history only",
            repo.name,
            config.tag.revision()
        ),
        None => {}
    }

    let range = resolve_range(previous, &config.tag);
    let count = git.count_commits(&range)?;
    let subjects = git.subjects_in(&range)?;
    Ok(compose(&range, &config.tag, branch, count, &subjects))
}

/// A commit message on disk for the lifetime of one commit.
///
/// The path stays in the run's [`PendingFiles`] until the file is removed,
/// so an interrupt handler can clean it up too.
pub struct MessageFile {
    file: Option<NamedTempFile>,
    pending: PendingFiles,
}

impl MessageFile {
    /// Writes `message` to a fresh, uniquely named file in `dir`, or in the
    /// system temp directory.
    pub fn create(
        dir: Option<&Path>,
        message: &MergeMessage,
        pending: &PendingFiles,
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(MESSAGE_FILE_PREFIX);
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        pending.track(file.path());
        let mut message_file = Self {
            file: None,
            pending: pending.clone(),
        };
        let file = message_file.file.insert(file);
        file.write_all(message.render().as_bytes())?;
        file.flush()?;
        Ok(message_file)
    }

    pub fn path(&self) -> &Path {
        self.file
            .as_ref()
            .map(NamedTempFile::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Removes the file, reporting failures that drop would swallow.
    pub fn remove(mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            self.pending.release(file.path());
            file.close()?;
        }
        Ok(())
    }
}

impl Drop for MessageFile {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            self.pending.release(file.path());
        }
    }
}
