use listsync_core::trigger::ScrollMetrics;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// The bottom of the list scrolled into view.
    More,
    /// The sentinel row left the viewport.
    Hide,
    Scroll(ScrollMetrics),
    Search(String),
    Order(Option<String>),
    Process(Option<String>),
    Refresh,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  more                         bottom of the list came into view
  hide                         sentinel row left the viewport (stops loading)
  scroll <top> <client> <height>  report scroll container geometry
  search [term]                edit the search box (debounced)
  order [-field]               set or clear the ordering key
  process [id]                 set or clear the process scope
  refresh                      reload from the first page
  show                         print every loaded entity
  help                         this text
  quit                         exit";

pub fn parse_command(line: &str) -> Result<HostCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let optional = |rest: &str| (!rest.is_empty()).then(|| rest.to_string());

    match word.to_ascii_lowercase().as_str() {
        "more" | "m" => Ok(HostCommand::More),
        "hide" => Ok(HostCommand::Hide),
        "scroll" => parse_scroll(rest).map(HostCommand::Scroll),
        "search" | "s" => Ok(HostCommand::Search(rest.to_string())),
        "order" | "o" => Ok(HostCommand::Order(optional(rest))),
        "process" | "p" => Ok(HostCommand::Process(optional(rest))),
        "refresh" | "r" => Ok(HostCommand::Refresh),
        "show" | "ls" => Ok(HostCommand::Show),
        "help" | "?" => Ok(HostCommand::Help),
        "quit" | "q" | "exit" => Ok(HostCommand::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}', type 'help'")),
    }
}

fn parse_scroll(rest: &str) -> Result<ScrollMetrics, String> {
    let values = rest
        .split_whitespace()
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| format!("'{part}' is not a pixel count"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        [scroll_top, client_height, scroll_height] => Ok(ScrollMetrics {
            scroll_top: *scroll_top,
            client_height: *client_height,
            scroll_height: *scroll_height,
        }),
        _ => Err("usage: scroll <top> <client> <height>".to_string()),
    }
}
