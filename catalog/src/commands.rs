use crate::events::AppCommand;

pub const HELP: &str = "\
Commands:
  open <path>                 go to a view: /, /products/<id>, /products/new,
                              /products/edit/<id>, /login
  login <email> <password>    log in (returns to the page that asked for it)
  logout                      log out
  save field=value ...        submit the product form (name, description, price, stock)
  delete                      delete the product being viewed
  whoami                      show the logged-in user
  help                        show this help
  quit                        exit";

/// Map one line of user input to a command.
///
/// `Ok(None)` for blank lines; `Err` carries a message for the user.
pub fn parse_line(line: &str) -> Result<Option<AppCommand>, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "" => return Ok(None),
        "open" | "go" => {
            if rest.is_empty() {
                return Err("usage: open <path>".to_string());
            }
            AppCommand::Open(rest.to_string())
        }
        "login" => {
            let Some((email, password)) = rest.split_once(char::is_whitespace) else {
                return Err("usage: login <email> <password>".to_string());
            };
            AppCommand::Login {
                email: email.to_string(),
                password: password.trim().to_string(),
            }
        }
        "logout" => AppCommand::Logout,
        "save" => AppCommand::Save(parse_assignments(rest)?),
        "delete" => AppCommand::Delete,
        "whoami" => AppCommand::WhoAmI,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" | "q" => AppCommand::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };

    Ok(Some(command))
}

/// Split `name=Big widget price=9.99` into pairs. A word without `=`
/// continues the previous value, so values may contain spaces.
fn parse_assignments(input: &str) -> Result<Vec<(String, String)>, String> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for word in input.split_whitespace() {
        match word.split_once('=') {
            Some((key, value)) if is_field_name(key) => {
                pairs.push((key.to_string(), value.to_string()));
            }
            _ => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("expected field=value, got '{}'", word)),
            },
        }
    }

    Ok(pairs)
}

fn is_field_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
}
