use std::io::{stdin, stdout, Write};

#[macro_export]
macro_rules! check {
  ($cond: expr, $prompt: literal $(, $( $params: expr $(,)? )* )? ) => {
    if !$cond {
      tracing::warn!("[!] {}", format!($prompt $(, $( $params, )* )?));
    }
  }
}

pub fn read_from_stdin(hidden: bool, prompt: &str) -> std::io::Result<String> {
    if hidden {
        return rpassword::prompt_password(prompt);
    }

    print!("{}", prompt);
    stdout().flush()?;

    let mut read = String::new();
    stdin().read_line(&mut read)?;

    Ok(read.trim_end_matches(['\r', '\n']).to_string())
}

/// Relative paths from a newline separated list, skipping blank lines and
/// `#` comments.
pub fn parse_file_list(list: &str) -> Vec<String> {
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_start_matches("./").to_string())
        .collect()
}
