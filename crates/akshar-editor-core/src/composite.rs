//! Commands that need user input or post-processing.
//!
//! Each one validates first and only then mutates through
//! [`Editor::execute`]. Cancelled prompts abort silently; invalid input is
//! reported through [`Prompter::alert`].

use web_time::Instant;

use crate::commands::{
    BlockType, Command, CommandOutcome, ListStyle, normalize_link_url, parse_table_dimension,
    parse_table_size, parse_video_ref,
};
use crate::controller::{Editor, FollowUp};
use crate::error::CommandInputError;
use crate::markup;
use crate::platform::{EditingSurface, ImageRequest, ImageSource, Prompter};
use crate::types::Origin;

/// Prompt and return the trimmed answer, or `None` if cancelled or blank.
fn ask(prompter: &mut dyn Prompter, message: &str, default: &str) -> Option<String> {
    let answer = prompter.prompt(message, default)?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

fn reject(prompter: &mut dyn Prompter, err: CommandInputError) -> CommandOutcome {
    tracing::debug!(error = %err, "command input rejected");
    prompter.alert(&err.to_string());
    CommandOutcome::Aborted
}

impl<S: EditingSurface> Editor<S> {
    fn run(&mut self, command: Command, now: Instant) -> CommandOutcome {
        if self.execute(&command, Origin::User, now) {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Ignored
        }
    }

    pub fn insert_heading(&mut self, level: u8, now: Instant) -> CommandOutcome {
        self.run(Command::SetBlock(BlockType::Heading(level)), now)
    }

    /// Toggle a list. Plain lists are tagged once the surface has settled.
    pub fn insert_list(&mut self, style: ListStyle, now: Instant) -> CommandOutcome {
        let outcome = self.run(Command::List(style.kind()), now);
        if outcome == CommandOutcome::Applied && style == ListStyle::Plain {
            self.schedule(FollowUp::TagPlainList, now);
        }
        outcome
    }

    /// Ask for a URL and link the selection, or insert the URL as a link.
    pub fn insert_link(&mut self, prompter: &mut dyn Prompter, now: Instant) -> CommandOutcome {
        if !self.is_active() {
            return CommandOutcome::Ignored;
        }
        let Some(answer) = ask(prompter, "Enter link URL", "https://") else {
            return CommandOutcome::Aborted;
        };
        let url = match normalize_link_url(&answer) {
            Ok(url) => url,
            Err(err) => return reject(prompter, err),
        };
        if self.surface.has_selection() {
            self.run(Command::CreateLink(url), now)
        } else {
            self.run(Command::InsertHtml(markup::link(&url)), now)
        }
    }

    /// Ask for `rows x cols` (or rows, then columns) and insert a table.
    pub fn insert_table(&mut self, prompter: &mut dyn Prompter, now: Instant) -> CommandOutcome {
        if !self.is_active() {
            return CommandOutcome::Ignored;
        }
        let Some(answer) = ask(prompter, "Table size (rows x columns)", "3x3") else {
            return CommandOutcome::Aborted;
        };
        let size = match parse_table_size(&answer) {
            Ok(size) => size,
            Err(size_err) => {
                let rows = match parse_table_dimension(&answer) {
                    Ok(rows) => rows,
                    Err(_) => return reject(prompter, size_err),
                };
                let Some(cols) = ask(prompter, "Number of columns", "3") else {
                    return CommandOutcome::Aborted;
                };
                match parse_table_dimension(&cols) {
                    Ok(cols) => (rows, cols),
                    Err(err) => return reject(prompter, err),
                }
            }
        };
        self.run(Command::InsertHtml(markup::table(size.0, size.1)), now)
    }

    pub fn insert_video(&mut self, prompter: &mut dyn Prompter, now: Instant) -> CommandOutcome {
        if !self.is_active() {
            return CommandOutcome::Ignored;
        }
        let Some(answer) = ask(prompter, "YouTube or Vimeo URL", "") else {
            return CommandOutcome::Aborted;
        };
        match parse_video_ref(&answer) {
            Ok(video) => self.run(Command::InsertHtml(markup::video_embed(&video)), now),
            Err(err) => reject(prompter, err),
        }
    }

    pub fn insert_quote(&mut self, prompter: &mut dyn Prompter, now: Instant) -> CommandOutcome {
        if !self.is_active() {
            return CommandOutcome::Ignored;
        }
        let Some(text) = prompter.prompt("Quote text", "") else {
            return CommandOutcome::Aborted;
        };
        if text.trim().is_empty() {
            return reject(prompter, CommandInputError::EmptyQuote);
        }
        self.run(Command::InsertHtml(markup::blockquote(&text)), now)
    }

    pub fn insert_horizontal_rule(&mut self, now: Instant) -> CommandOutcome {
        self.run(Command::InsertHorizontalRule, now)
    }

    /// Insert an image whose URL is already known.
    pub fn insert_image(&mut self, url: &str, now: Instant) -> CommandOutcome {
        let url = url.trim();
        if url.is_empty() {
            return CommandOutcome::Aborted;
        }
        self.run(Command::InsertHtml(markup::image(url, "")), now)
    }

    /// Ask the image collaborator for a URL.
    ///
    /// A pending upload is finished later with
    /// [`complete_image`](Self::complete_image).
    pub fn begin_image_insert(
        &mut self,
        source: &mut dyn ImageSource,
        now: Instant,
    ) -> CommandOutcome {
        if !self.is_active() {
            return CommandOutcome::Ignored;
        }
        match source.request_image() {
            ImageRequest::Ready(url) => self.insert_image(&url, now),
            ImageRequest::Pending => {
                tracing::debug!("image upload pending");
                self.awaiting_image = true;
                CommandOutcome::Pending
            }
            ImageRequest::Cancelled => CommandOutcome::Aborted,
        }
    }

    /// Finish a pending image insertion. Ignored if none is pending, e.g.
    /// after teardown.
    pub fn complete_image(&mut self, url: &str, now: Instant) -> CommandOutcome {
        if !self.awaiting_image {
            tracing::debug!("no image insertion pending");
            return CommandOutcome::Ignored;
        }
        self.awaiting_image = false;
        self.insert_image(url, now)
    }
}
