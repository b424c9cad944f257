use clap::{Args, Subcommand};

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Open a URL in a fresh tab, closing all other tabs first
    Open(OpenArgs),

    /// Close every open tab without stopping the browser
    ClosePages,

    /// Ask the browser process to shut down
    CloseBrowser,

    /// Print the page's main content as plain text
    GetText(PageArgs),

    /// Print the page's main content as Markdown
    GetMarkdown(PageArgs),

    /// Print an indented outline of the accessibility tree
    GetAriaSnapshot(PageArgs),

    /// Scroll to the bottom of the page, letting lazy content load
    ScrollBottom,

    /// Click the interactable element whose label matches the given text
    Click(TextArgs),

    /// Type text into the currently focused element
    Type(TextArgs),

    /// Press a key combination, e.g. "enter" or "ctrl+a"
    Press(ComboArgs),

    /// List all interactable elements the classifier currently sees
    Dump,

    /// Open the DevTools frontend for the active page
    Debug(PageArgs),

    /// Extract repeated records from the page's dominant container
    Scrape(ScrapeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct OpenArgs {
    /// Destination URL; a missing scheme defaults to http://
    pub url: String,

    /// Launch a visible browser window if one has to be started
    #[arg(long)]
    pub non_headless: bool,
}

#[derive(Args, Clone, Debug)]
pub struct PageArgs {
    /// Navigate here first; otherwise use the currently visible tab
    pub url: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct TextArgs {
    pub text: String,
}

#[derive(Args, Clone, Debug)]
pub struct ComboArgs {
    /// Plus-separated keys, modifiers first, e.g. "ctrl+shift+t"
    pub combo: String,
}

#[derive(Args, Clone, Debug)]
pub struct ScrapeArgs {
    /// Keep only these labels in each extracted record (repeatable)
    #[arg(long = "filter", value_name = "LABEL")]
    pub filter: Vec<String>,
}
