//! RSS/Atom feeds: cacheable syndication views over bills, votes, committee
//! meetings, and debates, scoped per jurisdiction or per personalization
//! token.
//!
//! Every scope shares one code path (`respond`): it renders a scope's
//! `FeedItem` list once per rebuild, caches the body keyed by scope plus a
//! freshness fingerprint, and answers repeat requests from cache until the
//! underlying data actually moves. RSS and Atom variants of the same scope
//! share that cached body's source items, never the rendered bytes, so the
//! two formats can't drift from one another.

mod guid;
mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::AppState;
use crate::cache::CacheEntry;
use crate::error::ApiError;
use crate::extract::jurisdiction;
use crate::ratelimit::HourlyLimiter;

const IP_LIMIT: u32 = 60;
const TOKEN_LIMIT: u32 = 30;
const SCOPE_ITEM_LIMIT: i64 = 50;
const BODY_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct FeedItem {
    guid: String,
    title: String,
    link: String,
    description: String,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Rss,
    Atom,
}

impl Format {
    const fn content_type(self) -> &'static str {
        match self {
            Self::Rss => "application/rss+xml; charset=utf-8",
            Self::Atom => "application/atom+xml; charset=utf-8",
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Rss => "xml",
            Self::Atom => "atom",
        }
    }
}

fn render_format(format: Format, title: &str, link: &str, description: &str, items: &[FeedItem]) -> String {
    match format {
        Format::Rss => render::render_rss(title, link, description, items),
        Format::Atom => render::render_atom(title, link, items),
    }
}

enum Client {
    Ip(SocketAddr),
    Token(String),
}

fn rebuild_limiter(state: &AppState, scope_key: &str) -> Arc<HourlyLimiter> {
    state
        .feed_rebuild_limiters
        .entry(scope_key.to_string())
        .or_insert_with(|| Arc::new(HourlyLimiter::new(state.feed_rebuild_budget)))
        .clone()
}

fn client_limiter(state: &AppState, client: &Client) -> Arc<HourlyLimiter> {
    match client {
        Client::Ip(addr) => state
            .feed_ip_limiters
            .entry(addr.ip().to_string())
            .or_insert_with(|| Arc::new(HourlyLimiter::new(IP_LIMIT)))
            .clone(),
        Client::Token(token) => state
            .feed_token_limiters
            .entry(token.clone())
            .or_insert_with(|| Arc::new(HourlyLimiter::new(TOKEN_LIMIT)))
            .clone(),
    }
}

/// Renders or replays a feed scope and wraps it in the shared syndication
/// response contract (ETag/Last-Modified/Cache-Control, conditional 304,
/// and rate-limit headers).
#[allow(clippy::too_many_arguments)]
async fn respond(
    state: &AppState,
    scope_key: &str,
    title: &str,
    link: &str,
    description: &str,
    format: Format,
    items: Vec<FeedItem>,
    client: Client,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    client_limiter(state, &client).check().map_err(|secs| ApiError::RateLimited { retry_after_secs: secs })?;
    state.feed_global_limiter.check().map_err(|secs| ApiError::RateLimited { retry_after_secs: secs })?;

    let cache_key = format!("{scope_key}.{}", format.suffix());
    let fingerprint = items.iter().map(|it| it.pub_date).max().map_or_else(|| "empty".to_string(), |t| t.to_rfc3339());
    let existing = state.cache.get(&cache_key);
    let fresh = existing.as_ref().is_some_and(|e| e.etag == format!("\"{fingerprint}\""));

    let (entry, stale) = if fresh {
        (existing.expect("checked Some above"), false)
    } else if let Err(_wait) = rebuild_limiter(state, scope_key).check() {
        match existing {
            Some(cached) => (cached, true),
            None => {
                let body = render_format(format, title, link, description, &items);
                let entry = CacheEntry::new(body, format.content_type(), &fingerprint, Utc::now(), BODY_TTL_SECS);
                state.cache.insert(cache_key.clone(), entry.clone());
                (entry, false)
            }
        }
    } else {
        let body = render_format(format, title, link, description, &items);
        let entry = CacheEntry::new(body, format.content_type(), &fingerprint, Utc::now(), BODY_TTL_SECS);
        state.cache.insert(cache_key.clone(), entry.clone());
        (entry, false)
    };

    let cache_control = if stale {
        "public, max-age=300, stale-while-revalidate=60"
    } else {
        "public, max-age=300"
    };

    let mut response_headers = HeaderMap::new();
    response_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(entry.content_type));
    if let Ok(etag) = HeaderValue::from_str(&entry.etag) {
        response_headers.insert(header::ETAG, etag);
    }
    if let Ok(last_modified) = HeaderValue::from_str(&entry.last_modified.to_rfc2822()) {
        response_headers.insert(header::LAST_MODIFIED, last_modified);
    }
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == entry.etag);

    if not_modified {
        return Ok((StatusCode::NOT_MODIFIED, response_headers).into_response());
    }
    Ok((StatusCode::OK, response_headers, entry.body).into_response())
}

async fn all_items(state: &AppState, jur: &str) -> Result<Vec<FeedItem>, ApiError> {
    let (bills, _) = state.db.bills().list(jur, None, None, &[], SCOPE_ITEM_LIMIT, 0).await?;
    let (votes, _) = state.db.votes().list(jur, None, None, None, None, SCOPE_ITEM_LIMIT, 0).await?;
    let (debates, _) = state.db.debates().list(jur, None, None, SCOPE_ITEM_LIMIT, 0).await?;

    let mut items: Vec<FeedItem> = Vec::with_capacity(bills.len() + votes.len() + debates.len());
    for bill in bills {
        if let Some(date) = bill.introduced_date {
            items.push(FeedItem {
                guid: guid::build(jur, "bill", &bill.natural_id(), "introduced", date),
                title: bill.title_en.clone().unwrap_or_else(|| bill.natural_id()),
                link: format!("/api/v1/{jur}/bills/{}", bill.id),
                description: bill.summary_en.clone().unwrap_or_default(),
                pub_date: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            });
        }
    }
    for vote in votes {
        items.push(FeedItem {
            guid: guid::build(jur, "vote", &vote.vote_id, "recorded", vote.vote_date),
            title: vote.description_en.clone().unwrap_or_else(|| vote.vote_id.clone()),
            link: format!("/api/v1/{jur}/votes/{}", vote.vote_id),
            description: format!("{} ({} yea / {} nay)", vote.result.as_str(), vote.yea_count, vote.nay_count),
            pub_date: vote.vote_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        });
    }
    for debate in debates {
        items.push(FeedItem {
            guid: guid::build(jur, "debate", &debate.hansard_id, "sitting", debate.debate_date),
            title: debate.topic_en.clone().unwrap_or_else(|| debate.hansard_id.clone()),
            link: format!("/api/v1/{jur}/debates/{}", debate.hansard_id),
            description: debate.topic_fr.clone().unwrap_or_default(),
            pub_date: debate.debate_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        });
    }

    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
    items.truncate(SCOPE_ITEM_LIMIT as usize);
    Ok(items)
}

fn bill_item(jur: &str, bill: &camparl_core::Bill) -> Vec<FeedItem> {
    let mut items = Vec::new();
    if let Some(date) = bill.introduced_date {
        items.push(FeedItem {
            guid: guid::build(jur, "bill", &bill.natural_id(), "introduced", date),
            title: bill.title_en.clone().unwrap_or_else(|| bill.natural_id()),
            link: format!("/api/v1/{jur}/bills/{}", bill.id),
            description: bill.summary_en.clone().unwrap_or_default(),
            pub_date: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        });
    }
    if let Some(date) = bill.royal_assent_date {
        items.push(FeedItem {
            guid: guid::build(jur, "bill", &bill.natural_id(), "royal_assent", date),
            title: format!("{} received royal assent", bill.title_en.clone().unwrap_or_else(|| bill.natural_id())),
            link: format!("/api/v1/{jur}/bills/{}", bill.id),
            description: bill.royal_assent_chapter.clone().unwrap_or_default(),
            pub_date: date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        });
    }
    items
}

async fn politician_items(state: &AppState, jur: &str, politician: &camparl_core::Politician) -> Result<Vec<FeedItem>, ApiError> {
    let records = state.db.vote_records().list_for_politician(politician.id, SCOPE_ITEM_LIMIT).await?;
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        let Some(vote) = state.db.votes().get_by_id(record.vote_id).await? else { continue };
        items.push(FeedItem {
            guid: guid::build(jur, "vote_record", &format!("{}-{}", vote.vote_id, politician.politician_id), "cast", vote.vote_date),
            title: format!("{} voted {} on {}", politician.display_name(), record.position.as_str(), vote.vote_id),
            link: format!("/api/v1/{jur}/votes/{}", vote.vote_id),
            description: vote.description_en.unwrap_or_default(),
            pub_date: vote.vote_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        });
    }
    Ok(items)
}

fn committee_item(jur: &str, committee: &camparl_core::Committee, meeting: &camparl_core::CommitteeMeeting) -> FeedItem {
    let natural_id = format!("{}-{}-{}", committee.parliament, committee.session, committee.slug);
    FeedItem {
        guid: guid::build(jur, "committee_meeting", &format!("{natural_id}-{}", meeting.meeting_number), "held", meeting.meeting_date),
        title: meeting.title_en.clone().unwrap_or_else(|| format!("Meeting {}", meeting.meeting_number)),
        link: format!("/api/v1/{jur}/committees/{natural_id}/meetings"),
        description: committee.name_en.clone(),
        pub_date: meeting.meeting_date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
    }
}

fn request_link(client: &Client) -> String {
    match client {
        Client::Ip(_) => "public".to_string(),
        Client::Token(token) => format!("p/{token}"),
    }
}

pub async fn all_xml(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    all_feed(state, jur, addr, headers, Format::Rss).await
}

pub async fn all_atom(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    all_feed(state, jur, addr, headers, Format::Atom).await
}

async fn all_feed(state: Arc<AppState>, jur: String, addr: SocketAddr, headers: HeaderMap, format: Format) -> Result<Response, ApiError> {
    let jur = jurisdiction(&jur)?;
    let items = all_items(&state, jur.as_str()).await?;
    let title = format!("{} - recent updates", jur.as_str());
    respond(&state, &format!("{}/all", jur.as_str()), &title, &request_link(&Client::Ip(addr)), "All recent legislative activity", format, items, Client::Ip(addr), &headers).await
}

pub async fn bills_latest_xml(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    bills_latest_feed(state, jur, addr, headers, Format::Rss).await
}

pub async fn bills_latest_atom(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    bills_latest_feed(state, jur, addr, headers, Format::Atom).await
}

async fn bills_latest_feed(state: Arc<AppState>, jur: String, addr: SocketAddr, headers: HeaderMap, format: Format) -> Result<Response, ApiError> {
    let jur = jurisdiction(&jur)?;
    let (bills, _) = state.db.bills().list(jur.as_str(), None, None, &[], SCOPE_ITEM_LIMIT, 0).await?;
    let items: Vec<FeedItem> = bills.iter().flat_map(|b| bill_item(jur.as_str(), b)).collect();
    let title = format!("{} - latest bills", jur.as_str());
    respond(&state, &format!("{}/bills/latest", jur.as_str()), &title, "bills/latest", "Recently introduced bills", format, items, Client::Ip(addr), &headers).await
}

/// Axum path params must occupy a whole segment, so `{tag}.xml` can't be
/// matched as a mixed literal/capture segment. Every scope below instead
/// captures the full trailing segment and splits the format suffix here.
fn split_ext(raw: &str) -> Result<(&str, Format), ApiError> {
    if let Some(stem) = raw.strip_suffix(".atom") {
        Ok((stem, Format::Atom))
    } else if let Some(stem) = raw.strip_suffix(".xml") {
        Ok((stem, Format::Rss))
    } else {
        Err(ApiError::validation("feed path must end in .xml or .atom"))
    }
}

fn parse_uuid_ext(raw: &str, what: &str) -> Result<(Uuid, Format), ApiError> {
    let (stem, format) = split_ext(raw)?;
    let id = stem.parse().map_err(|_| ApiError::validation_field(format!("invalid {what} id"), what))?;
    Ok((id, format))
}

pub async fn bills_tag(
    State(state): State<Arc<AppState>>,
    Path((jur, tag_ext)): Path<(String, String)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (tag, format) = split_ext(&tag_ext)?;
    let jur = jurisdiction(&jur)?;
    let bills = state.db.bills().list_by_tag(jur.as_str(), tag, SCOPE_ITEM_LIMIT).await?;
    let items: Vec<FeedItem> = bills.iter().flat_map(|b| bill_item(jur.as_str(), b)).collect();
    let title = format!("{} - bills tagged {tag}", jur.as_str());
    respond(&state, &format!("{}/bills/tag/{tag}", jur.as_str()), &title, &format!("bills/tag/{tag}"), "Bills matching a subject tag", format, items, Client::Ip(addr), &headers).await
}

pub async fn bill(
    State(state): State<Arc<AppState>>,
    Path((jur, bill_ext)): Path<(String, String)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (bill_id, format) = parse_uuid_ext(&bill_ext, "bill_id")?;
    let jur = jurisdiction(&jur)?;
    let bill = state
        .db
        .bills()
        .get_by_id(bill_id)
        .await?
        .filter(|b| b.jurisdiction == jur.as_str())
        .ok_or_else(|| ApiError::not_found(format!("bill {bill_id}")))?;
    let items = bill_item(jur.as_str(), &bill);
    let title = bill.title_en.clone().unwrap_or_else(|| bill.natural_id());
    respond(&state, &format!("{}/bill/{bill_id}", jur.as_str()), &title, &format!("bill/{bill_id}"), "Bill lifecycle events", format, items, Client::Ip(addr), &headers).await
}

pub async fn mp(
    State(state): State<Arc<AppState>>,
    Path((jur, politician_ext)): Path<(String, String)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (politician_id, format) = parse_uuid_ext(&politician_ext, "politician_id")?;
    let jur = jurisdiction(&jur)?;
    let politician = state
        .db
        .politicians()
        .get_by_id(politician_id)
        .await?
        .filter(|p| p.jurisdiction == jur.as_str())
        .ok_or_else(|| ApiError::not_found(format!("politician {politician_id}")))?;
    let items = politician_items(&state, jur.as_str(), &politician).await?;
    let title = format!("{} - voting record", politician.display_name());
    respond(&state, &format!("{}/mp/{politician_id}", jur.as_str()), &title, &format!("mp/{politician_id}"), "Recorded votes cast by this member", format, items, Client::Ip(addr), &headers).await
}

pub async fn committee(
    State(state): State<Arc<AppState>>,
    Path((jur, committee_ext)): Path<(String, String)>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (committee_id, format) = parse_uuid_ext(&committee_ext, "committee_id")?;
    let jur = jurisdiction(&jur)?;
    let committee = state
        .db
        .committees()
        .get_by_id(committee_id)
        .await?
        .filter(|c| c.jurisdiction == jur.as_str())
        .ok_or_else(|| ApiError::not_found(format!("committee {committee_id}")))?;
    let (meetings, _) = state.db.committee_meetings().list_for_committee(committee.id, SCOPE_ITEM_LIMIT, 0).await?;
    let items: Vec<FeedItem> = meetings.iter().map(|m| committee_item(jur.as_str(), &committee, m)).collect();
    let title = format!("{} meetings", committee.name_en);
    respond(&state, &format!("{}/committee/{committee_id}", jur.as_str()), &title, &format!("committee/{committee_id}"), "Committee meeting schedule", format, items, Client::Ip(addr), &headers).await
}

pub async fn personalized(
    State(state): State<Arc<AppState>>,
    Path((jur, token_ext)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (token, format) = split_ext(&token_ext)?;
    let token = token.to_string();
    let jur = jurisdiction(&jur)?;
    let resolved = state
        .db
        .feed_tokens()
        .resolve(&token)
        .await?
        .ok_or_else(|| ApiError::not_found("unknown or revoked feed token"))?;
    let exclude_ids = state.db.ignored_bills().ignored_bill_ids(&resolved.device_id).await?;
    let (bills, _) = state.db.bills().list(jur.as_str(), None, None, &exclude_ids, SCOPE_ITEM_LIMIT, 0).await?;
    let items: Vec<FeedItem> = bills.iter().flat_map(|b| bill_item(jur.as_str(), b)).collect();
    respond(
        &state,
        &format!("{}/p/{token}", jur.as_str()),
        "Personalized bill feed",
        &request_link(&Client::Token(token.clone())),
        "Bills not excluded by this device's ignore list",
        format,
        items,
        Client::Token(token),
        &headers,
    )
    .await
}
