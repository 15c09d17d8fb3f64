// src/scriptlet/mod.rs

//! User and group provisioning mined from package scriptlets
//!
//! Scriptlets are shell fragments; we do not execute or fully parse them.
//! Each logical line containing `useradd ` or `groupadd ` is tokenized on
//! whitespace and walked with a cursor. Options are looked up in a flag
//! table that says whether to skip them, skip them with their operand, or
//! capture the operand into a record field. The first token that is not an
//! option (and not part of a quoted literal) is the user or group name.

use crate::classifier::info::{GroupRecord, UserRecord};
use std::collections::BTreeMap;

const USERADD: &str = "useradd ";
const GROUPADD: &str = "groupadd ";

/// What to do when an option token is found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction<F> {
    /// Option without operand
    Skip,
    /// Option whose operand is ignored
    SkipValue,
    /// Option whose operand is stored in a field
    Capture(F),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserField {
    Home,
    Gid,
    Uid,
    Shell,
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupField {
    Gid,
}

const USERADD_FLAGS: &[(&str, FlagAction<UserField>)] = &[
    ("-D", FlagAction::Skip),
    ("--defaults", FlagAction::Skip),
    ("-m", FlagAction::Skip),
    ("--create-home", FlagAction::Skip),
    ("-l", FlagAction::Skip),
    ("--no-log-init", FlagAction::Skip),
    ("-M", FlagAction::Skip),
    ("--no-create-home", FlagAction::Skip),
    ("-N", FlagAction::Skip),
    ("--no-user-group", FlagAction::Skip),
    ("-o", FlagAction::Skip),
    ("--non-unique", FlagAction::Skip),
    ("-r", FlagAction::Skip),
    ("--system", FlagAction::Skip),
    ("-U", FlagAction::Skip),
    ("--user-group", FlagAction::Skip),
    // The comment text itself is handled as a quoted literal
    ("-c", FlagAction::Skip),
    ("--comment", FlagAction::Skip),
    ("-e", FlagAction::SkipValue),
    ("--expiredate", FlagAction::SkipValue),
    ("-f", FlagAction::SkipValue),
    ("--inactive", FlagAction::SkipValue),
    ("-k", FlagAction::SkipValue),
    ("--skel", FlagAction::SkipValue),
    ("-K", FlagAction::SkipValue),
    ("--key", FlagAction::SkipValue),
    ("-p", FlagAction::SkipValue),
    ("--password", FlagAction::SkipValue),
    ("-R", FlagAction::SkipValue),
    ("--root", FlagAction::SkipValue),
    ("-P", FlagAction::SkipValue),
    ("--prefix", FlagAction::SkipValue),
    ("-Z", FlagAction::SkipValue),
    ("--selinux-user", FlagAction::SkipValue),
    ("-d", FlagAction::Capture(UserField::Home)),
    ("--home-dir", FlagAction::Capture(UserField::Home)),
    ("-g", FlagAction::Capture(UserField::Gid)),
    ("--gid", FlagAction::Capture(UserField::Gid)),
    ("-u", FlagAction::Capture(UserField::Uid)),
    ("--uid", FlagAction::Capture(UserField::Uid)),
    ("-s", FlagAction::Capture(UserField::Shell)),
    ("--shell", FlagAction::Capture(UserField::Shell)),
    ("-G", FlagAction::Capture(UserField::Groups)),
    ("--groups", FlagAction::Capture(UserField::Groups)),
];

const GROUPADD_FLAGS: &[(&str, FlagAction<GroupField>)] = &[
    ("-f", FlagAction::Skip),
    ("--force", FlagAction::Skip),
    ("-o", FlagAction::Skip),
    ("--non-unique", FlagAction::Skip),
    ("-r", FlagAction::Skip),
    ("--system", FlagAction::Skip),
    ("-K", FlagAction::SkipValue),
    ("--key", FlagAction::SkipValue),
    ("-p", FlagAction::SkipValue),
    ("--password", FlagAction::SkipValue),
    ("-R", FlagAction::SkipValue),
    ("--root", FlagAction::SkipValue),
    ("-P", FlagAction::SkipValue),
    ("--prefix", FlagAction::SkipValue),
    ("-g", FlagAction::Capture(GroupField::Gid)),
    ("--gid", FlagAction::Capture(GroupField::Gid)),
];

fn lookup<F: Copy>(table: &[(&str, FlagAction<F>)], token: &str) -> Option<FlagAction<F>> {
    table
        .iter()
        .find(|(flag, _)| *flag == token)
        .map(|(_, action)| *action)
}

/// Result of walking one command's arguments
#[derive(Debug)]
struct Scan<F> {
    name: String,
    captured: Vec<(F, String)>,
}

/// Cursor over the whitespace-separated arguments of a command
struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
    in_literal: bool,
}

impl<'a> TokenCursor<'a> {
    fn new(args: &'a str) -> Self {
        Self {
            tokens: args.split_whitespace().collect(),
            pos: 0,
            in_literal: false,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Walk options until the entity name is found
    fn scan<F: Copy>(&mut self, table: &[(&str, FlagAction<F>)]) -> Option<Scan<F>> {
        let mut captured = Vec::new();

        while let Some(token) = self.next_token() {
            let quotes = token.chars().filter(|c| *c == '"' || *c == '\'').count();
            if quotes > 0 {
                // An unbalanced quote opens or closes a literal spanning tokens
                if quotes % 2 == 1 {
                    self.in_literal = !self.in_literal;
                }
                continue;
            }

            if self.in_literal {
                continue;
            }

            match lookup(table, token) {
                Some(FlagAction::Skip) => {}
                Some(FlagAction::SkipValue) => {
                    self.next_token();
                }
                Some(FlagAction::Capture(field)) => {
                    let value = self.next_token().unwrap_or_default();
                    captured.push((field, value.to_string()));
                }
                None => {
                    return Some(Scan {
                        name: token.to_string(),
                        captured,
                    });
                }
            }
        }

        None
    }
}

/// Join backslash-continued physical lines into logical lines
pub fn logical_lines(data: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut pending = String::new();

    for line in data.lines() {
        let line = line.trim();

        if let Some(head) = line.strip_suffix('\\') {
            pending.push_str(head.trim_end());
            pending.push(' ');
            continue;
        }

        pending.push_str(line);
        result.push(std::mem::take(&mut pending));
    }

    if !pending.is_empty() {
        result.push(pending.trim_end().to_string());
    }

    result
}

/// Parse the arguments following `useradd ` in a command line
pub fn parse_useradd(line: &str) -> Option<UserRecord> {
    let idx = line.find(USERADD)?;
    let scan = TokenCursor::new(&line[idx + USERADD.len()..]).scan(USERADD_FLAGS)?;

    let mut user = UserRecord::bare(scan.name);
    for (field, value) in scan.captured {
        let slot = match field {
            UserField::Home => &mut user.home,
            UserField::Gid => &mut user.gid,
            UserField::Uid => &mut user.uid,
            UserField::Shell => &mut user.shell,
            UserField::Groups => &mut user.groups,
        };
        *slot = Some(value);
    }

    Some(user)
}

/// Parse the arguments following `groupadd ` in a command line
pub fn parse_groupadd(line: &str) -> Option<GroupRecord> {
    let idx = line.find(GROUPADD)?;
    let scan = TokenCursor::new(&line[idx + GROUPADD.len()..]).scan(GROUPADD_FLAGS)?;

    let mut group = GroupRecord::bare(scan.name);
    for (field, value) in scan.captured {
        match field {
            GroupField::Gid => group.gid = Some(value),
        }
    }

    Some(group)
}

/// Record every user created by the scriptlets; later lines win
pub fn extract_users(scriptlets: &str, users: &mut BTreeMap<String, UserRecord>) {
    for line in logical_lines(scriptlets) {
        if let Some(user) = parse_useradd(&line) {
            users.insert(user.name.clone(), user);
        }
    }
}

/// Record every group created by the scriptlets; later lines win
pub fn extract_groups(scriptlets: &str, groups: &mut BTreeMap<String, GroupRecord>) {
    for line in logical_lines(scriptlets) {
        if let Some(group) = parse_groupadd(&line) {
            groups.insert(group.name.clone(), group);
        }
    }
}
