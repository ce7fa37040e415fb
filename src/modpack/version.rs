use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static RELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?(?:-(pre|rc)(\d+))?$").expect("valid release pattern")
});

static SNAPSHOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})w(\d{2})([a-z])$").expect("valid snapshot pattern"));

/// Minecraft version identifier supporting releases, pre-releases and weekly snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVersion {
    pub original: String,
    pub parsed: GameVersionType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameVersionType {
    /// `1.20`, `1.20.4`, `1.21-pre2`, `1.21-rc1`, normalised to semver
    Release(semver::Version),
    /// `23w45a`
    Snapshot { year: u32, week: u32, build: char },
    Unknown(String),
}

impl GameVersion {
    pub fn parse(version: &str) -> Self {
        let trimmed = version.trim();
        let parsed = if let Some(release) = Self::parse_release(trimmed) {
            GameVersionType::Release(release)
        } else if let Some(snapshot) = Self::parse_snapshot(trimmed) {
            snapshot
        } else {
            GameVersionType::Unknown(trimmed.to_string())
        };

        GameVersion {
            original: version.to_string(),
            parsed,
        }
    }

    fn parse_release(version: &str) -> Option<semver::Version> {
        let caps = RELEASE.captures(version)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = match caps.get(3) {
            Some(p) => p.as_str().parse().ok()?,
            None => 0,
        };

        let mut release = semver::Version::new(major, minor, patch);
        if let (Some(kind), Some(number)) = (caps.get(4), caps.get(5)) {
            // `pre.10` compares numerically, `pre10` would not
            let pre = format!("{}.{}", kind.as_str(), number.as_str());
            release.pre = semver::Prerelease::new(&pre).ok()?;
        }
        Some(release)
    }

    fn parse_snapshot(version: &str) -> Option<GameVersionType> {
        let caps = SNAPSHOT.captures(version)?;
        Some(GameVersionType::Snapshot {
            year: caps[1].parse().ok()?,
            week: caps[2].parse().ok()?,
            build: caps[3].chars().next()?,
        })
    }

    /// Whether `self` precedes `other`.
    ///
    /// Releases and snapshots cannot be ordered against each other without a
    /// release calendar, so mixed or unrecognised pairs fall back to plain
    /// string ordering.
    pub fn is_older_than(&self, other: &GameVersion) -> bool {
        match self.partial_cmp(other) {
            Some(ordering) => ordering == Ordering::Less,
            None => self.original < other.original,
        }
    }
}

impl PartialOrd for GameVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (&self.parsed, &other.parsed) {
            (GameVersionType::Release(a), GameVersionType::Release(b)) => Some(a.cmp(b)),
            (
                GameVersionType::Snapshot {
                    year: ay,
                    week: aw,
                    build: ab,
                },
                GameVersionType::Snapshot {
                    year: by,
                    week: bw,
                    build: bb,
                },
            ) => Some((ay, aw, ab).cmp(&(by, bw, bb))),
            _ => None,
        }
    }
}
