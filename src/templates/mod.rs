//! HTML templates and styling for the note pages.
//!
//! ## Module Structure
//!
//! - `styles` - CSS shared by every page
//! - `components` - Document shell, footer and message pages
//! - `editor` - Markdown textarea with paste-to-upload
//! - `viewer` - Owner view, public share view and the help page
//! - `search` - Similarity search form and results
//! - `login` - Sign-in form and OAuth failure page

mod styles;
mod components;
mod editor;
mod viewer;
mod search;
mod login;

pub use styles::STYLE;
pub use components::{base_html, layout, message_page, page_footer, search_link};
pub use editor::{render_editor, EditorPage};
pub use viewer::{asset_tags, render_how_to_use, render_note_view, render_shared_note, DEFAULT_TITLE};
pub use search::render_search;
pub use login::{render_login, render_login_failed};
