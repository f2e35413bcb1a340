//! Admin API records.
//!
//! Every field is optional. Absent fields are left out of request bodies, so
//! a PATCH only touches what the caller set; fields missing from a response
//! stay `None` after decoding.

use chrono::{DateTime, Utc};
use ghe_core::optional_fields;
use serde::{Deserialize, Serialize};

/// Mapping between a user account and an LDAP entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLdapMapping {
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// LDAP distinguished name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldap_dn: Option<String>,
    /// Login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Gravatar ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravatar_id: Option<String>,
    /// Account type (`User`, `Organization`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Site administrator flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_admin: Option<bool>,

    /// API URL of the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Events URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_url: Option<String>,
    /// Following URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_url: Option<String>,
    /// Followers URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_url: Option<String>,
    /// Gists URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gists_url: Option<String>,
    /// Organizations URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations_url: Option<String>,
    /// Received events URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_events_url: Option<String>,
    /// Repositories URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos_url: Option<String>,
    /// Starred URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_url: Option<String>,
    /// Subscriptions URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions_url: Option<String>,
}

optional_fields!(UserLdapMapping {
    id: value i64 => id, with_id;
    ldap_dn: text String => ldap_dn, with_ldap_dn;
    login: text String => login, with_login;
    avatar_url: text String => avatar_url, with_avatar_url;
    gravatar_id: text String => gravatar_id, with_gravatar_id;
    kind: text String => kind, with_kind;
    site_admin: value bool => site_admin, with_site_admin;
    url: text String => url, with_url;
    events_url: text String => events_url, with_events_url;
    following_url: text String => following_url, with_following_url;
    followers_url: text String => followers_url, with_followers_url;
    gists_url: text String => gists_url, with_gists_url;
    organizations_url: text String => organizations_url, with_organizations_url;
    received_events_url: text String => received_events_url, with_received_events_url;
    repos_url: text String => repos_url, with_repos_url;
    starred_url: text String => starred_url, with_starred_url;
    subscriptions_url: text String => subscriptions_url, with_subscriptions_url;
});

/// Mapping between a team and an LDAP group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLdapMapping {
    /// Team ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// LDAP distinguished name of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldap_dn: Option<String>,
    /// API URL of the team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Team name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Team slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Privacy level (`secret`, `closed`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    /// Default repository permission (`pull`, `push`, `admin`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// Members URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_url: Option<String>,
    /// Repositories URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repositories_url: Option<String>,
}

optional_fields!(TeamLdapMapping {
    id: value i64 => id, with_id;
    ldap_dn: text String => ldap_dn, with_ldap_dn;
    url: text String => url, with_url;
    name: text String => name, with_name;
    slug: text String => slug, with_slug;
    description: text String => description, with_description;
    privacy: text String => privacy, with_privacy;
    permission: text String => permission, with_permission;
    members_url: text String => members_url, with_members_url;
    repositories_url: text String => repositories_url, with_repositories_url;
});

/// Billing plan attached to a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Disk space allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<i64>,
    /// Collaborator allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<i64>,
    /// Private repository allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_repos: Option<i64>,
}

optional_fields!(Plan {
    name: text String => name, with_name;
    space: value i64 => space, with_space;
    collaborators: value i64 => collaborators, with_collaborators;
    private_repos: value i64 => private_repos, with_private_repos;
});

/// A user account.
///
/// Shared with the rest of the platform's user model; admin operations only
/// populate a subset of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// User ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Profile page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    /// Gravatar ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravatar_id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Blog URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    /// Location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Hireable flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hireable: Option<bool>,
    /// Biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Public repository count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_repos: Option<i64>,
    /// Public gist count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_gists: Option<i64>,
    /// Follower count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<i64>,
    /// Following count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<i64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Suspension timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_at: Option<DateTime<Utc>>,
    /// Account type (`User`, `Organization`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Site administrator flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_admin: Option<bool>,
    /// Total private repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_private_repos: Option<i64>,
    /// Owned private repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_private_repos: Option<i64>,
    /// Private gist count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_gists: Option<i64>,
    /// Disk usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<i64>,
    /// Collaborator count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<i64>,
    /// Billing plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    /// API URL of the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Events URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_url: Option<String>,
    /// Following URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_url: Option<String>,
    /// Followers URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_url: Option<String>,
    /// Gists URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gists_url: Option<String>,
    /// Organizations URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizations_url: Option<String>,
    /// Received events URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_events_url: Option<String>,
    /// Repositories URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos_url: Option<String>,
    /// Starred URL template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_url: Option<String>,
    /// Subscriptions URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions_url: Option<String>,
}

optional_fields!(User {
    login: text String => login, with_login;
    id: value i64 => id, with_id;
    avatar_url: text String => avatar_url, with_avatar_url;
    html_url: text String => html_url, with_html_url;
    gravatar_id: text String => gravatar_id, with_gravatar_id;
    name: text String => name, with_name;
    company: text String => company, with_company;
    blog: text String => blog, with_blog;
    location: text String => location, with_location;
    email: text String => email, with_email;
    hireable: value bool => hireable, with_hireable;
    bio: text String => bio, with_bio;
    public_repos: value i64 => public_repos, with_public_repos;
    public_gists: value i64 => public_gists, with_public_gists;
    followers: value i64 => followers, with_followers;
    following: value i64 => following, with_following;
    created_at: value DateTime<Utc> => created_at, with_created_at;
    updated_at: value DateTime<Utc> => updated_at, with_updated_at;
    suspended_at: value DateTime<Utc> => suspended_at, with_suspended_at;
    kind: text String => kind, with_kind;
    site_admin: value bool => site_admin, with_site_admin;
    total_private_repos: value i64 => total_private_repos, with_total_private_repos;
    owned_private_repos: value i64 => owned_private_repos, with_owned_private_repos;
    private_gists: value i64 => private_gists, with_private_gists;
    disk_usage: value i64 => disk_usage, with_disk_usage;
    collaborators: value i64 => collaborators, with_collaborators;
    plan: record Plan => plan, with_plan;
    url: text String => url, with_url;
    events_url: text String => events_url, with_events_url;
    following_url: text String => following_url, with_following_url;
    followers_url: text String => followers_url, with_followers_url;
    gists_url: text String => gists_url, with_gists_url;
    organizations_url: text String => organizations_url, with_organizations_url;
    received_events_url: text String => received_events_url, with_received_events_url;
    repos_url: text String => repos_url, with_repos_url;
    starred_url: text String => starred_url, with_starred_url;
    subscriptions_url: text String => subscriptions_url, with_subscriptions_url;
});

/// Status message returned by admin operations that queue a background job.
///
/// `url` points at the resource the job acts on; polling it is left to the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMessage {
    /// Human-readable status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// URL to inspect once the job completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

optional_fields!(AdminMessage {
    message: text String => message, with_message;
    url: text String => url, with_url;
});

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_ldap_mapping_serializes_only_present_fields() {
        let mapping =
            UserLdapMapping::default().with_ldap_dn("uid=asdf,ou=users,dc=github,dc=com");

        let body = serde_json::to_value(&mapping).unwrap();
        assert_eq!(body, json!({"ldap_dn": "uid=asdf,ou=users,dc=github,dc=com"}));
    }

    #[test]
    fn empty_record_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&User::default()).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&TeamLdapMapping::default()).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&AdminMessage::default()).unwrap(), "{}");
    }

    #[test]
    fn present_zero_values_are_serialized() {
        let user = User::default()
            .with_gravatar_id("")
            .with_site_admin(false)
            .with_public_repos(0);

        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(
            body,
            json!({"gravatar_id": "", "site_admin": false, "public_repos": 0})
        );

        let decoded: User = serde_json::from_value(body).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn absent_and_zero_are_not_equal() {
        let absent = UserLdapMapping::default().with_login("octocat");
        let explicit = absent.clone().with_site_admin(false);

        assert_ne!(absent, explicit);
        assert!(!absent.site_admin());
        assert!(!explicit.site_admin());

        assert_ne!(User::default(), User::default().with_email(""));
        assert_ne!(
            TeamLdapMapping::default(),
            TeamLdapMapping::default().with_id(0)
        );
    }

    #[test]
    fn type_field_uses_wire_name() {
        let user = User::default().with_kind("Organization");
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"type": "Organization"})
        );

        let mapping: UserLdapMapping = serde_json::from_str(r#"{"type":"User"}"#).unwrap();
        assert_eq!(mapping.kind(), "User");
    }

    #[test]
    fn null_and_missing_fields_decode_as_absent() {
        let message: AdminMessage =
            serde_json::from_str(r#"{"message":"queued","url":null}"#).unwrap();
        assert_eq!(message.message(), "queued");
        assert!(message.url.is_none());

        let team: TeamLdapMapping = serde_json::from_str(r#"{"id":3,"extra":"ignored"}"#).unwrap();
        assert_eq!(team, TeamLdapMapping::default().with_id(3));
    }

    #[test]
    fn user_timestamps_and_plan_round_trip() {
        let created = "2011-01-25T18:44:36Z".parse::<DateTime<Utc>>().unwrap();
        let user = User::default()
            .with_login("octocat")
            .with_created_at(created)
            .with_plan(Plan::default().with_name("enterprise").with_private_repos(0));

        let body = serde_json::to_value(&user).unwrap();
        assert_eq!(
            body,
            json!({
                "login": "octocat",
                "created_at": "2011-01-25T18:44:36Z",
                "plan": {"name": "enterprise", "private_repos": 0}
            })
        );

        let decoded: User = serde_json::from_value(body).unwrap();
        assert_eq!(decoded, user);
        assert_eq!(decoded.created_at(), created);
        assert_eq!(decoded.plan().map(Plan::name), Some("enterprise"));
    }

    #[test]
    fn absent_timestamp_reads_as_epoch() {
        let user = User::default();
        assert_eq!(user.updated_at(), DateTime::<Utc>::default());
        assert_eq!(user.updated_at().timestamp(), 0);
    }

    #[test]
    fn display_lists_present_fields() {
        let message = AdminMessage::default().with_message("Job queued");
        assert_eq!(message.to_string(), r#"AdminMessage{message:"Job queued"}"#);

        let mapping = TeamLdapMapping::default()
            .with_id(1)
            .with_ldap_dn("cn=Ops,ou=teams,dc=github,dc=com");
        assert_eq!(
            mapping.to_string(),
            r#"TeamLdapMapping{id:1, ldap_dn:"cn=Ops,ou=teams,dc=github,dc=com"}"#
        );
    }

    #[test]
    fn display_nests_plan_in_same_form() {
        let user = User::default()
            .with_login("hubot")
            .with_plan(Plan::default().with_name("enterprise").with_private_repos(9999));
        assert_eq!(
            user.to_string(),
            r#"User{login:"hubot", plan:Plan{name:"enterprise", private_repos:9999}}"#
        );
    }
}
