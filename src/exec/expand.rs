use crate::exec::ast::{SimpleCommand, Word, WordPart};
use crate::exec::env;

/// Resolve a word to its final string. Undefined variables expand to nothing.
pub fn expand_word(word: &Word) -> String {
    let mut res = String::new();
    for part in &word.0 {
        match part {
            WordPart::Literal(s) => res.push_str(s),
            WordPart::Variable(name) => {
                if let Some(val) = env::get_var(name) {
                    res.push_str(&val);
                }
            }
        }
    }
    res
}

pub fn expand_verb(cmd: &SimpleCommand) -> Option<String> {
    cmd.verb.as_ref().map(expand_word)
}

/// Verb followed by each expanded parameter.
pub fn build_argv(cmd: &SimpleCommand) -> Vec<String> {
    let mut argv = Vec::with_capacity(cmd.params.len() + 1);
    if let Some(verb) = expand_verb(cmd) {
        argv.push(verb);
    }
    argv.extend(cmd.params.iter().map(expand_word));
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_expand_concatenation() {
        env::set_var("MINISH_EXPAND_DIR", "/tmp").unwrap();
        let word = Word(vec![
            WordPart::Variable("MINISH_EXPAND_DIR".to_string()),
            WordPart::Literal("/out.txt".to_string()),
        ]);
        assert_eq!(expand_word(&word), "/tmp/out.txt");
    }

    #[test]
    fn test_undefined_variable_is_empty() {
        let word = Word(vec![
            WordPart::Literal("a".to_string()),
            WordPart::Variable("MINISH_SURELY_UNDEFINED_VAR".to_string()),
            WordPart::Literal("b".to_string()),
        ]);
        assert_eq!(expand_word(&word), "ab");
    }

    #[test]
    fn test_build_argv() {
        let cmd = SimpleCommand::new("echo", &["hello", "world"]);
        assert_eq!(build_argv(&cmd), vec!["echo", "hello", "world"]);
    }
}
