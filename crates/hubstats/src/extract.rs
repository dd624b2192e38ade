//! Title grammars, one per event kind.
//!
//! Every grammar is anchored at both ends. Repository names may contain `/` or spaces, so the
//! repository name group always takes the rest of the title.

use regex::{Captures, Regex};

use crate::event::EventBuilder;
use crate::event_type::EventKind;

const ISSUES: &str = r"^([^ ]+) ([^ ]+) issue ([0-9]+) on ([^/]+)/(.*)$";
const PUSH: &str = r"^([^ ]+) pushed to ([^ ]+) at ([^/]+)/(.*)$";
const CREATE_REF: &str = r"^([^ ]+) created (branch|tag) ([^ ]+) at ([^/]+)/(.*)$";
const CREATE_REPOSITORY: &str = r"^([^ ]+) created repository (.*)$";
const WATCH: &str = r"^([^ ]+) started watching ([^/]+)/(.*)$";
const MEMBER: &str = r"^([^ ]+) ([^ ]+) ([^ ]+) to (.*)$";
const FORK: &str = r"^([^ ]+) forked ([^/]+)/(.*)$";
const PUBLIC: &str = r"^([^ ]+).* ([^ ]+)$";
const GOLLUM: &str = r"^([^ ]+) ([^ ]+) a page in the ([^/]+)/(.*)$";
const DELETE: &str = r"^([^ ]+) deleted (branch|tag) ([^ ]+) at (.*)$";
const DOWNLOAD: &str = r"^([^ ]+) ([^ ]+) a file to ([^/]+)/(.*)$";
const FOLLOW: &str = r"^([^ ]+) started following (.*)$";
const GIST: &str = r"^([^ ]+) ([^ ]+) gist: ([0-9]+)$";
const PULL_REQUEST: &str = r"^([^ ]+) ([^ ]+) pull request ([0-9]+) on ([^/]+)/(.*)$";
const COMMIT_COMMENT: &str = r"^([^ ]+) commented on ([^/]+)/(.*)$";

/// Candidate field values read from a title. Validation happens later, in the builder.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PartialFields {
    pub actor: Option<String>,
    pub repo_account: Option<String>,
    pub repo_name: Option<String>,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub alternate_id: Option<u64>,
    pub sub_type: Option<String>,
}

impl PartialFields {
    /// Copies every extracted value onto `builder`.
    pub fn apply(self, mut builder: EventBuilder) -> EventBuilder {
        if let Some(actor) = self.actor {
            builder = builder.actor(actor);
        }
        if let Some(account) = self.repo_account {
            builder = builder.repo_account(account);
        }
        if let Some(name) = self.repo_name {
            builder = builder.repo_name(name);
        }
        if let Some(branch) = self.branch {
            builder = builder.branch(branch);
        }
        if let Some(tag) = self.tag {
            builder = builder.tag(tag);
        }
        if let Some(id) = self.alternate_id {
            builder = builder.alternate_id(id);
        }
        if let Some(sub_type) = self.sub_type {
            builder = builder.sub_type(sub_type);
        }
        builder
    }

    fn set_ref(&mut self, ref_kind: &str, name: String) {
        if ref_kind == "tag" {
            self.tag = Some(name);
        } else {
            self.branch = Some(name);
        }
    }
}

/// Compiled title grammars for all event kinds.
///
/// Build once with [`Grammar::new`] and share by reference; matching never mutates it.
#[derive(Debug, Clone)]
pub struct Grammar {
    issues: Regex,
    push: Regex,
    create_ref: Regex,
    create_repository: Regex,
    watch: Regex,
    member: Regex,
    fork: Regex,
    public: Regex,
    gollum: Regex,
    delete: Regex,
    download: Regex,
    follow: Regex,
    gist: Regex,
    pull_request: Regex,
    commit_comment: Regex,
}

impl Grammar {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            issues: Regex::new(ISSUES)?,
            push: Regex::new(PUSH)?,
            create_ref: Regex::new(CREATE_REF)?,
            create_repository: Regex::new(CREATE_REPOSITORY)?,
            watch: Regex::new(WATCH)?,
            member: Regex::new(MEMBER)?,
            fork: Regex::new(FORK)?,
            public: Regex::new(PUBLIC)?,
            gollum: Regex::new(GOLLUM)?,
            delete: Regex::new(DELETE)?,
            download: Regex::new(DOWNLOAD)?,
            follow: Regex::new(FOLLOW)?,
            gist: Regex::new(GIST)?,
            pull_request: Regex::new(PULL_REQUEST)?,
            commit_comment: Regex::new(COMMIT_COMMENT)?,
        })
    }

    /// Matches `title` against the grammar of the declared `kind` only.
    pub fn extract(&self, kind: EventKind, title: &str) -> Option<PartialFields> {
        match kind {
            EventKind::Push => self.push(title),
            EventKind::Create => self.create(title),
            EventKind::Watch => self.watch(title),
            EventKind::Issues => self.numbered_on_repository(&self.issues, title),
            EventKind::Follow => self.follow(title),
            EventKind::Fork => self.repository_action(&self.fork, title),
            EventKind::Gist => self.gist(title),
            EventKind::Member => self.member(title),
            EventKind::PullRequest => self.numbered_on_repository(&self.pull_request, title),
            EventKind::Download => self.sub_typed_on_repository(&self.download, title),
            EventKind::Gollum => self.sub_typed_on_repository(&self.gollum, title),
            EventKind::Delete => self.delete(title),
            EventKind::Public => self.public(title),
            EventKind::CommitComment => self.repository_action(&self.commit_comment, title),
        }
    }

    fn push(&self, title: &str) -> Option<PartialFields> {
        let caps = self.push.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            branch: group(&caps, 2),
            repo_account: group(&caps, 3),
            repo_name: group(&caps, 4),
            ..PartialFields::default()
        })
    }

    // Branch/tag form first, then the repository form.
    fn create(&self, title: &str) -> Option<PartialFields> {
        if let Some(caps) = self.create_ref.captures(title) {
            let mut fields = PartialFields {
                actor: group(&caps, 1),
                repo_account: group(&caps, 4),
                repo_name: group(&caps, 5),
                ..PartialFields::default()
            };
            fields.set_ref(&caps[2], caps[3].to_string());
            return Some(fields);
        }

        let caps = self.create_repository.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            repo_account: group(&caps, 1),
            repo_name: group(&caps, 2),
            ..PartialFields::default()
        })
    }

    fn watch(&self, title: &str) -> Option<PartialFields> {
        self.repository_action(&self.watch, title)
    }

    fn follow(&self, title: &str) -> Option<PartialFields> {
        let caps = self.follow.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            repo_account: group(&caps, 2),
            ..PartialFields::default()
        })
    }

    fn gist(&self, title: &str) -> Option<PartialFields> {
        let caps = self.gist.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            sub_type: group(&caps, 2),
            alternate_id: Some(number(&caps, 3)?),
            ..PartialFields::default()
        })
    }

    // Actor and account are swapped here: the account owner adds the actor.
    fn member(&self, title: &str) -> Option<PartialFields> {
        let caps = self.member.captures(title)?;
        Some(PartialFields {
            repo_account: group(&caps, 1),
            sub_type: group(&caps, 2),
            actor: group(&caps, 3),
            repo_name: group(&caps, 4),
            ..PartialFields::default()
        })
    }

    fn delete(&self, title: &str) -> Option<PartialFields> {
        let caps = self.delete.captures(title)?;
        let mut fields = PartialFields {
            actor: group(&caps, 1),
            repo_account: group(&caps, 1),
            repo_name: group(&caps, 4),
            ..PartialFields::default()
        };
        fields.set_ref(&caps[2], caps[3].to_string());
        Some(fields)
    }

    /// Loose on purpose: first token is the actor (and account), last token the repository.
    fn public(&self, title: &str) -> Option<PartialFields> {
        let caps = self.public.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            repo_account: group(&caps, 1),
            repo_name: group(&caps, 2),
            ..PartialFields::default()
        })
    }

    /// `<actor> <verb...> <account>/<repoName>`
    fn repository_action(&self, pattern: &Regex, title: &str) -> Option<PartialFields> {
        let caps = pattern.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            repo_account: group(&caps, 2),
            repo_name: group(&caps, 3),
            ..PartialFields::default()
        })
    }

    /// `<actor> <subType> ... <account>/<repoName>`
    fn sub_typed_on_repository(&self, pattern: &Regex, title: &str) -> Option<PartialFields> {
        let caps = pattern.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            sub_type: group(&caps, 2),
            repo_account: group(&caps, 3),
            repo_name: group(&caps, 4),
            ..PartialFields::default()
        })
    }

    /// `<actor> <subType> <object> <number> on <account>/<repoName>`
    fn numbered_on_repository(&self, pattern: &Regex, title: &str) -> Option<PartialFields> {
        let caps = pattern.captures(title)?;
        Some(PartialFields {
            actor: group(&caps, 1),
            sub_type: group(&caps, 2),
            alternate_id: Some(number(&caps, 3)?),
            repo_account: group(&caps, 4),
            repo_name: group(&caps, 5),
            ..PartialFields::default()
        })
    }
}

fn group(caps: &Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx).map(|m| m.as_str().to_string())
}

// Digits that overflow u64 cannot be a real object number; treat as no match.
fn number(caps: &Captures<'_>, idx: usize) -> Option<u64> {
    caps.get(idx)?.as_str().parse().ok()
}
