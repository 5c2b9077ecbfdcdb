use recipe_core::Msg;

pub const HELP: &str = "\
Type an ingredient and press Enter to add it.
  :rm <n>       remove ingredient n
  :clear        clear ingredients
  :go           send it
  :reset        try again with an empty list
  :find <text>  suggest ingredients
  :help         show this help
  :quit         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    /// 1-based, as displayed.
    Remove(usize),
    Clear,
    Submit,
    Reset,
    Find(String),
    Help,
    Quit,
    Blank,
    Invalid(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Blank;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Add(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "rm" | "remove" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Remove(n),
            _ => Command::Invalid(format!("`:rm` needs an ingredient number, got {arg:?}")),
        },
        "clear" => Command::Clear,
        "go" | "send" => Command::Submit,
        "reset" | "again" => Command::Reset,
        "find" if !arg.is_empty() => Command::Find(arg.to_string()),
        "find" => Command::Invalid("`:find` needs some text".to_string()),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command `:{other}`")),
    }
}

impl Command {
    /// Messages for the state machine; empty for commands the prompt handles itself.
    pub fn into_msgs(self) -> Vec<Msg> {
        match self {
            Command::Add(text) => vec![Msg::InputChanged(text), Msg::IngredientSubmitted],
            Command::Remove(n) => vec![Msg::IngredientRemoved { index: n - 1 }],
            Command::Clear => vec![Msg::IngredientsCleared],
            Command::Submit => vec![Msg::SubmitClicked],
            Command::Reset => vec![Msg::ResetClicked],
            Command::Find(query) => vec![Msg::SearchRequested(query)],
            Command::Help | Command::Quit | Command::Blank | Command::Invalid(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_adds_ingredient() {
        assert_eq!(parse("  green onion "), Command::Add("green onion".to_string()));
        assert_eq!(parse("   "), Command::Blank);
    }

    #[test]
    fn commands_parse_arguments() {
        assert_eq!(parse(":rm 2"), Command::Remove(2));
        assert_eq!(parse(":find  tom "), Command::Find("tom".to_string()));
        assert_eq!(parse(":go"), Command::Submit);
        assert_eq!(parse(":q"), Command::Quit);
        assert!(matches!(parse(":rm 0"), Command::Invalid(_)));
        assert!(matches!(parse(":rm two"), Command::Invalid(_)));
        assert!(matches!(parse(":dance"), Command::Invalid(_)));
    }

    #[test]
    fn remove_maps_to_zero_based_index() {
        assert_eq!(
            Command::Remove(1).into_msgs(),
            vec![Msg::IngredientRemoved { index: 0 }]
        );
        assert_eq!(
            Command::Add("egg".to_string()).into_msgs(),
            vec![Msg::InputChanged("egg".to_string()), Msg::IngredientSubmitted]
        );
    }
}
