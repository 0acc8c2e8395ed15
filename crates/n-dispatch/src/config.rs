//! rc files — key mappings and options loaded at startup.
//!
//! One directive per line. Blank lines and lines starting with `#` are
//! ignored.
//!
//! | Directive                          | Effect                                   |
//! |------------------------------------|------------------------------------------|
//! | `map <mode> <lhs> <rhs>`           | `lhs` behaves as if `rhs` were typed     |
//! | `map! <mode> <lhs> <rhs>`          | same, replacing `lhs` and longer keys    |
//! | `map-window[!] <mode> <lhs> <rhs>` | same, for the current window only        |
//! | `unmap <mode> <lhs>`               | remove the mapping for `lhs`             |
//! | `unmap-window <mode> <lhs>`        | remove the window mapping for `lhs`      |
//! | `set idletimeout=<secs>`           | idle checkpoint delay (0 disables)       |
//!
//! Modes are named `normal`, `operator-pending`, `visual`, `visual-line`,
//! `insert` and `replace`. The right-hand side of a mapping is everything
//! after `lhs`, so it may name an action: `map normal a <vis-mode-insert>`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::binding::KeyBinding;
use crate::error::{ConfigError, MapError, ParseError};
use crate::mode::ModeId;
use crate::vis::Vis;

/// A parsed rc-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Map {
        window: bool,
        force: bool,
        mode: ModeId,
        lhs: String,
        rhs: String,
    },
    Unmap {
        window: bool,
        mode: ModeId,
        lhs: String,
    },
    IdleTimeout(Duration),
}

/// The directives of an rc file, with their line numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    directives: Vec<(usize, Directive)>,
}

impl Config {
    /// Parse rc-file text. Fails on the first invalid line.
    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let mut directives = Vec::new();
        for (i, line) in src.lines().enumerate() {
            let line_no = i + 1;
            match parse_line(line) {
                Ok(Some(directive)) => directives.push((line_no, directive)),
                Ok(None) => {}
                Err(kind) => return Err(ConfigError::Parse { line: line_no, kind }),
            }
        }
        Ok(Self { directives })
    }

    /// Read and parse the rc file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&src)?;
        debug!(path = %path.display(), directives = config.directives.len(), "rc file loaded");
        Ok(config)
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter().map(|(_, d)| d)
    }

    /// Apply every directive in order. Stops at the first mapping the
    /// binding store refuses; directives before it stay applied.
    pub fn apply(&self, vis: &mut Vis) -> Result<(), ConfigError> {
        for (line, directive) in &self.directives {
            apply_directive(vis, directive).map_err(|source| ConfigError::Map { line: *line, source })?;
        }
        Ok(())
    }
}

fn apply_directive(vis: &mut Vis, directive: &Directive) -> Result<(), MapError> {
    match directive {
        Directive::Map {
            window,
            force,
            mode,
            lhs,
            rhs,
        } => {
            let binding = KeyBinding::alias(rhs.as_str());
            if *window {
                vis.window_mode_map(*mode, *force, lhs, binding)
            } else {
                vis.mode_map(*mode, *force, lhs, binding)
            }
        }
        Directive::Unmap { window, mode, lhs } => {
            let removed = if *window {
                vis.window_mode_unmap(*mode, lhs)
            } else {
                vis.mode_unmap(*mode, lhs)
            };
            if !removed {
                debug!(mode = %mode, lhs = lhs.as_str(), "unmap of unmapped key");
            }
            Ok(())
        }
        Directive::IdleTimeout(timeout) => {
            for id in ModeId::ALL {
                let has_idle = vis.hooks(id).idle.is_some();
                if has_idle {
                    vis.modes_mut()[id].idle_timeout = *timeout;
                }
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split off the first whitespace-separated word.
fn word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

fn parse_line(line: &str) -> Result<Option<Directive>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (cmd, rest) = word(line);
    let directive = match cmd {
        "map" | "map!" | "map-window" | "map-window!" => {
            let (mode, rest) = parse_mode(rest)?;
            let (lhs, rhs) = word(rest);
            if lhs.is_empty() {
                return Err(ParseError::MissingArgument("key to map"));
            }
            if rhs.is_empty() {
                return Err(ParseError::MissingArgument("mapping target"));
            }
            Directive::Map {
                window: cmd.starts_with("map-window"),
                force: cmd.ends_with('!'),
                mode,
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            }
        }
        "unmap" | "unmap-window" => {
            let (mode, rest) = parse_mode(rest)?;
            let (lhs, rest) = word(rest);
            if lhs.is_empty() {
                return Err(ParseError::MissingArgument("key to unmap"));
            }
            no_trailing(rest)?;
            Directive::Unmap {
                window: cmd == "unmap-window",
                mode,
                lhs: lhs.to_string(),
            }
        }
        "set" => {
            let (arg, rest) = word(rest);
            no_trailing(rest)?;
            parse_set(arg)?
        }
        other => return Err(ParseError::UnknownDirective(other.to_string())),
    };
    Ok(Some(directive))
}

fn parse_mode(s: &str) -> Result<(ModeId, &str), ParseError> {
    let (name, rest) = word(s);
    if name.is_empty() {
        return Err(ParseError::MissingArgument("mode"));
    }
    let mode = name
        .parse()
        .map_err(|()| ParseError::UnknownMode(name.to_string()))?;
    Ok((mode, rest))
}

fn parse_set(arg: &str) -> Result<Directive, ParseError> {
    if arg.is_empty() {
        return Err(ParseError::MissingArgument("option"));
    }
    let (name, value) = arg.split_once('=').unwrap_or((arg, ""));
    match name {
        "idletimeout" | "it" => {
            let secs: u64 = value.parse().map_err(|_| ParseError::InvalidValue {
                option: name.to_string(),
                value: value.to_string(),
            })?;
            Ok(Directive::IdleTimeout(Duration::from_secs(secs)))
        }
        _ => Err(ParseError::UnknownOption(name.to_string())),
    }
}

fn no_trailing(rest: &str) -> Result<(), ParseError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ParseError::TrailingArgument(rest.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::testing::{self, Call};
    use pretty_assertions::assert_eq;

    fn parse_err(src: &str) -> (usize, ParseError) {
        match Config::parse(src) {
            Err(ConfigError::Parse { line, kind }) => (line, kind),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parse_map_variants() {
        let config = Config::parse(
            "map normal jj <Escape>\n\
             map! insert jk <Escape>\n\
             map-window visual x d\n\
             map-window! replace q <vis-mode-normal>\n",
        )
        .unwrap();
        let flags: Vec<_> = config
            .directives()
            .map(|d| match d {
                Directive::Map { window, force, mode, .. } => (*window, *force, *mode),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            flags,
            vec![
                (false, false, ModeId::Normal),
                (false, true, ModeId::Insert),
                (true, false, ModeId::Visual),
                (true, true, ModeId::Replace),
            ]
        );
    }

    #[test]
    fn rhs_is_rest_of_line() {
        let config = Config::parse("map normal Q  ihello world<Escape> ").unwrap();
        assert_eq!(
            config.directives().next(),
            Some(&Directive::Map {
                window: false,
                force: false,
                mode: ModeId::Normal,
                lhs: "Q".into(),
                rhs: "ihello world<Escape>".into(),
            })
        );
    }

    #[test]
    fn parse_unmap_and_set() {
        let config = Config::parse(
            "# comment\n\
             \n\
             unmap visual-line V\n\
             unmap-window normal x\n\
             set idletimeout=10\n",
        )
        .unwrap();
        assert_eq!(
            config.directives().cloned().collect::<Vec<_>>(),
            vec![
                Directive::Unmap {
                    window: false,
                    mode: ModeId::VisualLine,
                    lhs: "V".into(),
                },
                Directive::Unmap {
                    window: true,
                    mode: ModeId::Normal,
                    lhs: "x".into(),
                },
                Directive::IdleTimeout(Duration::from_secs(10)),
            ]
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(
            parse_err("map normal a b\nfrobnicate\n"),
            (2, ParseError::UnknownDirective("frobnicate".into()))
        );
        assert_eq!(
            parse_err("map NORMAL a b"),
            (1, ParseError::UnknownMode("NORMAL".into()))
        );
        assert_eq!(
            parse_err("\n\nmap normal a"),
            (3, ParseError::MissingArgument("mapping target"))
        );
        assert_eq!(parse_err("unmap"), (1, ParseError::MissingArgument("mode")));
        assert_eq!(
            parse_err("unmap normal a b"),
            (1, ParseError::TrailingArgument("b".into()))
        );
    }

    #[test]
    fn set_errors() {
        assert_eq!(
            parse_err("set tabstop=4"),
            (1, ParseError::UnknownOption("tabstop".into()))
        );
        assert_eq!(
            parse_err("set idletimeout=soon"),
            (
                1,
                ParseError::InvalidValue {
                    option: "idletimeout".into(),
                    value: "soon".into(),
                }
            )
        );
        assert_eq!(parse_err("set"), (1, ParseError::MissingArgument("option")));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/n-modal/rc")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    // ── applying ──────────────────────────────────────────────────────────

    #[test]
    fn apply_alias_mapping() {
        let (mut vis, log) = testing::vis();
        builtin::bind_defaults(&mut vis).unwrap();
        Config::parse("map insert jk <Escape>").unwrap().apply(&mut vis).unwrap();
        log.clear();

        vis.keys("ixjk");
        assert_eq!(vis.mode(), ModeId::Normal);
        assert_eq!(log.calls(), vec![Call::Insert("x".into()), Call::Checkpoint]);
    }

    #[test]
    fn apply_mapping_to_named_action() {
        let (mut vis, _) = testing::vis();
        Config::parse("map normal a <vis-mode-insert>").unwrap().apply(&mut vis).unwrap();
        vis.keys("a");
        assert_eq!(vis.mode(), ModeId::Insert);
    }

    #[test]
    fn apply_stops_at_refused_mapping() {
        let (mut vis, _) = testing::vis();
        let config = Config::parse(
            "map normal a b\n\
             map normal a c\n\
             map normal z y\n",
        )
        .unwrap();
        let err = config.apply(&mut vis).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Map {
                line: 2,
                source: MapError::Exists(_),
            }
        ));
        assert_eq!(vis.binding("a").and_then(|b| b.alias.as_deref()), Some("b"));
        assert!(vis.binding("z").is_none());
    }

    #[test]
    fn apply_force_and_unmap() {
        let (mut vis, _) = testing::vis();
        Config::parse(
            "map normal gg x\n\
             map! normal g y\n\
             map-window normal w z\n\
             unmap-window normal w\n",
        )
        .unwrap()
        .apply(&mut vis)
        .unwrap();
        assert!(vis.binding("gg").is_none());
        assert_eq!(vis.binding("g").and_then(|b| b.alias.as_deref()), Some("y"));
        assert!(vis.binding("w").is_none());
    }

    #[test]
    fn alias_loop_reported_with_line() {
        let (mut vis, _) = testing::vis();
        let err = Config::parse("map normal ab abc").unwrap().apply(&mut vis).unwrap_err();
        assert_eq!(err.to_string(), "line 1: alias `abc` would re-trigger `ab`");
    }

    #[test]
    fn idle_timeout_applies_to_idling_modes() {
        let (mut vis, _) = testing::vis();
        Config::parse("set idletimeout=7").unwrap().apply(&mut vis).unwrap();
        let timeouts: Vec<_> = ModeId::ALL
            .into_iter()
            .map(|id| vis.modes()[id].idle_timeout.as_secs())
            .collect();
        assert_eq!(timeouts, vec![0, 0, 0, 0, 7, 7]);
    }
}
