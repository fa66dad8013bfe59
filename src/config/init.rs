use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use super::{get_config_path, save_config, Config, ThemeMode};
use crate::report::DetailView;
use crate::scoring::{MAX_SCORE, MIN_SCORE};

/// Line-oriented prompt over any reader/writer pair.
struct Prompter<'a, R: BufRead, W: Write> {
    input: &'a mut R,
    out: &'a mut W,
    char_delay: Duration,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.out, "{}", message).context("Failed to write prompt")?;
        self.out.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt with a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Print text with a typewriter effect, one character at a time.
    fn typewriter(&mut self, text: &str) -> Result<()> {
        if self.char_delay.is_zero() {
            writeln!(self.out, "{}", text)?;
            return Ok(());
        }
        for c in text.chars() {
            write!(self.out, "{}", c)?;
            self.out.flush().ok();
            std::thread::sleep(self.char_delay);
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

/// Run the interactive init wizard on the terminal and write a config file.
///
/// If `default_path` is Some, it is offered as the save location instead of
/// `~/.config/acroscore/config.yaml`.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    let mut prompter = Prompter {
        input: &mut input,
        out: &mut out,
        char_delay: Duration::from_millis(18),
    };
    if let Some((path, config)) = ask_config(&mut prompter, default_path)? {
        save_config(&path, &config)?;
        println!();
        println!("Config written to {}", path.display());
        println!("Run `acroscore` to start a session.");
    }
    Ok(())
}

/// Ask every question; returns None when the user declines to overwrite.
fn ask_config<R: BufRead, W: Write>(
    p: &mut Prompter<'_, R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<(PathBuf, Config)>> {
    p.say("")?;
    p.typewriter("acroscore configuration wizard")?;
    p.say("==============================")?;
    p.say("")?;

    let defaults = Config::default();

    p.typewriter("Every slider of the evaluation form starts at the same value.")?;
    let default_score = loop {
        let input = p.prompt_with_default(
            &format!("Default slider value ({}-{})", MIN_SCORE, MAX_SCORE),
            &defaults.default_score.to_string(),
        )?;
        match input.parse::<i64>() {
            Ok(v) if (MIN_SCORE..=MAX_SCORE).contains(&v) => break v,
            _ => p.say(&format!(
                "  Invalid: must be a whole number from {} to {}. Try again.",
                MIN_SCORE, MAX_SCORE
            ))?,
        }
    };

    p.say("")?;
    p.typewriter("By default an evaluation may name an acronym nobody proposed yet.")?;
    let strict_acronyms =
        p.prompt_yes_no("Only accept evaluations of proposed acronyms?", false)?;

    p.say("")?;
    p.typewriter("The detail chart can show the first evaluation of an acronym, or the average of all of them.")?;
    let detail_view = loop {
        let input = p.prompt_with_default("Detail view (first/average)", "first")?;
        match input.to_lowercase().as_str() {
            "first" => break DetailView::First,
            "average" => break DetailView::Average,
            _ => p.say("  Invalid: answer 'first' or 'average'. Try again.")?,
        }
    };

    p.say("")?;
    let theme = loop {
        let input = p.prompt_with_default("Color theme (auto/dark/light)", "auto")?;
        match input.to_lowercase().as_str() {
            "auto" => break ThemeMode::Auto,
            "dark" => break ThemeMode::Dark,
            "light" => break ThemeMode::Light,
            _ => p.say("  Invalid: answer 'auto', 'dark' or 'light'. Try again.")?,
        }
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(None);
        }
    }

    Ok(Some((
        config_path,
        Config {
            default_score,
            strict_acronyms,
            detail_view,
            theme,
        },
    )))
}
