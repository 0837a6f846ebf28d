use std::path::PathBuf;

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan { dir: PathBuf, use_cache: bool },
    Forget(PathBuf),
    ClearCache,
    Help,
}

pub const USAGE: &str = "\
usage: choralith [--no-cache] [DIR]
       choralith --forget DIR
       choralith --clear-cache";

/// Parse arguments (without the program name). `DIR` defaults to `cwd`.
pub fn parse<I>(args: I, cwd: PathBuf) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut dir: Option<PathBuf> = None;
    let mut use_cache = true;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--clear-cache" => return Ok(Command::ClearCache),
            "--forget" => {
                return args
                    .next()
                    .map(|d| Command::Forget(PathBuf::from(d)))
                    .ok_or_else(|| "--forget needs a folder".to_string());
            }
            "--no-cache" => use_cache = false,
            s if s.starts_with("--") => return Err(format!("unknown option {s}")),
            _ => {
                if dir.is_some() {
                    return Err("only one folder can be scanned at a time".to_string());
                }
                dir = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Command::Scan {
        dir: dir.unwrap_or(cwd),
        use_cache,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(args: &[&str]) -> Result<Command, String> {
        parse(args.iter().map(|s| s.to_string()), PathBuf::from("/cwd"))
    }

    #[test]
    fn defaults_to_scanning_cwd_with_cache() {
        assert_eq!(
            p(&[]),
            Ok(Command::Scan {
                dir: PathBuf::from("/cwd"),
                use_cache: true
            })
        );
    }

    #[test]
    fn parses_dir_and_no_cache_in_any_order() {
        let expected = Ok(Command::Scan {
            dir: PathBuf::from("/music"),
            use_cache: false,
        });
        assert_eq!(p(&["/music", "--no-cache"]), expected);
        assert_eq!(p(&["--no-cache", "/music"]), expected);
    }

    #[test]
    fn parses_cache_maintenance() {
        assert_eq!(p(&["--clear-cache"]), Ok(Command::ClearCache));
        assert_eq!(
            p(&["--forget", "/music"]),
            Ok(Command::Forget(PathBuf::from("/music")))
        );
        assert!(p(&["--forget"]).is_err());
    }

    #[test]
    fn rejects_unknown_options_and_extra_dirs() {
        assert!(p(&["--bogus"]).is_err());
        assert!(p(&["/a", "/b"]).is_err());
        assert_eq!(p(&["-h"]), Ok(Command::Help));
    }
}
