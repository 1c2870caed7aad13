use super::group::{ForwardGroup, ForwardMode, ForwardOutcome, GroupKey, GroupState, PendingForward};
use super::reply::{assemble, error_reply};
use super::stats::ForwardingStats;
use ferrous_forward_domain::config::ForwardingConfig;
use ferrous_forward_domain::wire::{encode_message, rewrite_id};
use ferrous_forward_domain::{
    DomainError, Flags, Header, Message, Opcode, Question, RecordType, ResponseCode,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Upper bound on in-flight forwards so that ID allocation can always find a
/// free slot in the 16-bit space.
const MAX_IN_FLIGHT: usize = 60_000;

#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    pub query_timeout: Duration,
    pub max_pending: usize,
    pub passthrough_single: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self::from(&ForwardingConfig::default())
    }
}

impl From<&ForwardingConfig> for CoordinatorSettings {
    fn from(config: &ForwardingConfig) -> Self {
        Self {
            query_timeout: config.query_timeout(),
            max_pending: config.max_pending.min(MAX_IN_FLIGHT),
            passthrough_single: config.passthrough_single,
        }
    }
}

/// A datagram the caller must send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Upstream { generated_id: u16, payload: Vec<u8> },
    Client(ClientReply),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReply {
    pub to: SocketAddr,
    pub client_id: u16,
    pub payload: Vec<u8>,
    pub rcode: ResponseCode,
}

/// Splits client queries into upstream sub-queries and reassembles the
/// replies.
///
/// Pure state machine: it never touches a socket. Every entry point takes the
/// current instant so expiry is driven entirely by the caller.
pub struct ForwardingCoordinator {
    settings: CoordinatorSettings,
    pending: FxHashMap<u16, PendingForward>,
    groups: FxHashMap<GroupKey, ForwardGroup>,
    rng: fastrand::Rng,
    stats: ForwardingStats,
}

impl ForwardingCoordinator {
    pub fn new(settings: CoordinatorSettings) -> Self {
        Self::with_rng(settings, fastrand::Rng::new())
    }

    /// Seeded variant for reproducible ID sequences.
    pub fn with_rng(settings: CoordinatorSettings, rng: fastrand::Rng) -> Self {
        Self {
            settings: CoordinatorSettings {
                max_pending: settings.max_pending.clamp(1, MAX_IN_FLIGHT),
                ..settings
            },
            pending: FxHashMap::default(),
            groups: FxHashMap::default(),
            rng,
            stats: ForwardingStats::default(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn open_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn stats(&self) -> ForwardingStats {
        self.stats
    }

    /// Handles one datagram from a client.
    ///
    /// Decoding errors are returned; the datagram is then simply dropped.
    pub fn on_client_query(
        &mut self,
        datagram: &[u8],
        client: SocketAddr,
        now: Instant,
    ) -> Result<Vec<Dispatch>, DomainError> {
        let message = Message::decode(datagram)?;
        let header = message.header;

        if header.flags.qr {
            debug!(client = %client, id = header.id, "Dropping response received on client socket");
            return Ok(Vec::new());
        }

        if header.flags.opcode != Opcode::Query {
            debug!(
                client = %client,
                opcode = header.flags.opcode.to_u8(),
                "Unsupported opcode, answering NOTIMP"
            );
            return Ok(vec![self.local_reply(
                client,
                &header,
                &message.questions,
                ResponseCode::NotImp,
            )]);
        }

        if message.questions.is_empty() {
            let err = DomainError::Protocol("query carries no questions".to_string());
            debug!(client = %client, id = header.id, error = %err, "Answering FORMERR");
            return Ok(vec![self.local_reply(client, &header, &[], ResponseCode::FormErr)]);
        }

        let key = GroupKey {
            client,
            client_id: header.id,
        };
        if self.groups.contains_key(&key) {
            debug!(client = %client, id = header.id, "Retransmission of an open query, dropping");
            return Ok(Vec::new());
        }

        if self.pending.len() + message.questions.len() > self.settings.max_pending {
            warn!(
                client = %client,
                in_flight = self.pending.len(),
                limit = self.settings.max_pending,
                "Too many forwards in flight, answering SERVFAIL"
            );
            return Ok(vec![self.local_reply(
                client,
                &header,
                &message.questions,
                ResponseCode::ServFail,
            )]);
        }

        let mode = if self.settings.passthrough_single && message.questions.len() == 1 {
            ForwardMode::Passthrough
        } else {
            ForwardMode::Split
        };

        match self.open_group(key, &header, &message.questions, datagram, mode, now) {
            Ok(dispatches) => {
                self.stats.queries_accepted += 1;
                self.stats.subqueries_forwarded += dispatches.len() as u64;
                debug!(
                    client = %client,
                    id = header.id,
                    questions = message.questions.len(),
                    qtype = %RecordType::describe(message.questions[0].query_type),
                    mode = ?mode,
                    "Forwarding query"
                );
                Ok(dispatches)
            }
            Err(e) => {
                warn!(client = %client, id = header.id, error = %e, "Failed to forward query");
                Ok(vec![self.local_reply(
                    client,
                    &header,
                    &message.questions,
                    ResponseCode::ServFail,
                )])
            }
        }
    }

    fn open_group(
        &mut self,
        key: GroupKey,
        header: &Header,
        questions: &[Question],
        datagram: &[u8],
        mode: ForwardMode,
        now: Instant,
    ) -> Result<Vec<Dispatch>, DomainError> {
        let mut members: SmallVec<[u16; 4]> = SmallVec::with_capacity(questions.len());
        let mut dispatches = Vec::with_capacity(questions.len());

        for question in questions {
            let built = self.allocate_id(key.client_id).and_then(|generated_id| {
                let payload = match mode {
                    ForwardMode::Passthrough => {
                        let mut payload = datagram.to_vec();
                        rewrite_id(&mut payload, generated_id)?;
                        payload
                    }
                    ForwardMode::Split => sub_query(generated_id, header, question)?,
                };
                Ok((generated_id, payload))
            });

            let (generated_id, payload) = match built {
                Ok(built) => built,
                Err(e) => {
                    for id in &members {
                        self.pending.remove(id);
                    }
                    return Err(e);
                }
            };

            self.pending.insert(
                generated_id,
                PendingForward::new(generated_id, key, question.clone(), now),
            );
            members.push(generated_id);
            dispatches.push(Dispatch::Upstream {
                generated_id,
                payload,
            });
        }

        self.groups.insert(
            key,
            ForwardGroup {
                key,
                opcode: header.flags.opcode,
                recursion_desired: header.flags.rd,
                questions: questions.to_vec(),
                members,
                mode,
                created_at: now,
            },
        );
        Ok(dispatches)
    }

    /// Random starting point, then linear probe over the 16-bit space.
    fn allocate_id(&mut self, client_id: u16) -> Result<u16, DomainError> {
        let start = self.rng.u16(..);
        (0..=u16::MAX)
            .map(|offset| start.wrapping_add(offset))
            .find(|candidate| *candidate != client_id && !self.pending.contains_key(candidate))
            .ok_or_else(|| DomainError::Protocol("no free upstream query ID".to_string()))
    }

    /// Handles one datagram from the upstream resolver.
    ///
    /// Returns the client reply when this datagram completes a group. Replies
    /// that match no live forward are discarded.
    pub fn on_upstream_reply(
        &mut self,
        datagram: &[u8],
        now: Instant,
    ) -> Result<Option<ClientReply>, DomainError> {
        let message = Message::decode(datagram)?;
        let id = message.header.id;

        let Some(forward) = self.pending.get(&id) else {
            self.stats.stale_replies += 1;
            debug!(id, "Upstream reply matches no pending forward, discarding");
            return Ok(None);
        };

        if !message.header.flags.qr {
            self.stats.stale_replies += 1;
            debug!(id, "Upstream datagram is not a response, discarding");
            return Ok(None);
        }

        let question_matches = match message.questions.first() {
            Some(question) => question.matches(&forward.original_question),
            None => message.header.flags.rcode.is_error(),
        };
        if !question_matches {
            self.stats.stale_replies += 1;
            debug!(
                id,
                expected = %forward.original_question.name,
                "Upstream reply question does not match the forward, discarding"
            );
            return Ok(None);
        }

        if forward.received.is_some() {
            self.stats.stale_replies += 1;
            debug!(id, "Duplicate upstream reply, discarding");
            return Ok(None);
        }

        let key = forward.group;
        let Some(group) = self.groups.get(&key) else {
            self.pending.remove(&id);
            return Ok(None);
        };

        if group.is_expired(now, self.settings.query_timeout) {
            return Ok(self.expire_group(key, now));
        }

        let outcome = match group.mode {
            ForwardMode::Passthrough => ForwardOutcome::Relayed {
                raw: datagram.to_vec(),
            },
            ForwardMode::Split => ForwardOutcome::Answered {
                flags: message.header.flags,
                answers: message.answers,
            },
        };
        if let Some(forward) = self.pending.get_mut(&id) {
            debug!(
                id = forward.generated_id,
                client_id = key.client_id,
                rtt_ms = now.saturating_duration_since(forward.created_at).as_millis() as u64,
                "Upstream reply recorded"
            );
            forward.received = Some(outcome);
        }

        Ok(self.try_complete(key))
    }

    /// Records a local SERVFAIL for a forward whose upstream send failed.
    pub fn on_upstream_error(&mut self, generated_id: u16) -> Option<ClientReply> {
        let forward = self.pending.get_mut(&generated_id)?;
        if forward.received.is_some() {
            return None;
        }
        forward.received = Some(ForwardOutcome::Failed {
            rcode: ResponseCode::ServFail,
        });
        let key = forward.group;
        self.try_complete(key)
    }

    /// Fails every group older than the query timeout.
    ///
    /// Partial answers are discarded; each affected client gets SERVFAIL with
    /// its questions echoed.
    pub fn expire(&mut self, now: Instant) -> Vec<ClientReply> {
        let timeout = self.settings.query_timeout;
        let expired: Vec<GroupKey> = self
            .groups
            .values()
            .filter(|group| group.is_expired(now, timeout))
            .map(|group| group.key)
            .collect();

        expired
            .into_iter()
            .filter_map(|key| self.expire_group(key, now))
            .collect()
    }

    fn expire_group(&mut self, key: GroupKey, now: Instant) -> Option<ClientReply> {
        let group = self.release_group(key)?;
        for id in &group.members {
            self.pending.remove(id);
        }
        let elapsed = now.saturating_duration_since(group.created_at);

        self.stats.groups_timed_out += 1;
        self.stats.groups_failed += 1;
        let err = DomainError::UpstreamTimeout {
            client_id: key.client_id,
            elapsed_ms: elapsed.as_millis(),
        };
        warn!(
            client = %key.client,
            id = key.client_id,
            questions = group.questions.len(),
            error = %err,
            "Forward group timed out"
        );

        Some(self.group_error_reply(&group, ResponseCode::ServFail))
    }

    fn try_complete(&mut self, key: GroupKey) -> Option<ClientReply> {
        let group = self.groups.get(&key)?;
        let all_received = group.members.iter().all(|id| {
            self.pending
                .get(id)
                .is_some_and(|forward| forward.received.is_some())
        });
        if !all_received {
            return None;
        }

        let group = self.release_group(key)?;
        let forwards: Vec<PendingForward> = group
            .members
            .iter()
            .filter_map(|id| self.pending.remove(id))
            .collect();
        let outcomes: Vec<&ForwardOutcome> = forwards
            .iter()
            .filter_map(|forward| forward.received.as_ref())
            .collect();

        if outcomes.iter().any(|outcome| outcome.is_local_failure()) {
            let rcode = outcomes
                .iter()
                .map(|outcome| outcome.rcode())
                .find(|rcode| rcode.is_error())
                .unwrap_or(ResponseCode::ServFail);
            let reply = self.group_error_reply(&group, rcode);
            self.close_group(&group, GroupState::Failed, rcode);
            return Some(reply);
        }

        match assemble(&group, &outcomes) {
            Ok((payload, rcode)) => {
                let state = if rcode.is_error() {
                    GroupState::Failed
                } else {
                    GroupState::Complete
                };
                self.close_group(&group, state, rcode);
                Some(ClientReply {
                    to: key.client,
                    client_id: key.client_id,
                    payload,
                    rcode,
                })
            }
            Err(e) => {
                warn!(client = %key.client, id = key.client_id, error = %e, "Failed to assemble reply");
                self.close_group(&group, GroupState::Failed, ResponseCode::ServFail);
                Some(self.group_error_reply(&group, ResponseCode::ServFail))
            }
        }
    }

    /// Counts a released group under its terminal state.
    fn close_group(&mut self, group: &ForwardGroup, state: GroupState, rcode: ResponseCode) {
        match state {
            GroupState::Complete => self.stats.groups_completed += 1,
            GroupState::Failed => self.stats.groups_failed += 1,
        }
        debug!(
            client = %group.key.client,
            id = group.key.client_id,
            state = ?state,
            rcode = %rcode,
            "Forward group closed"
        );
    }

    fn release_group(&mut self, key: GroupKey) -> Option<ForwardGroup> {
        self.groups.remove(&key)
    }

    fn group_error_reply(&self, group: &ForwardGroup, rcode: ResponseCode) -> ClientReply {
        ClientReply {
            to: group.key.client,
            client_id: group.key.client_id,
            payload: error_reply(
                group.key.client_id,
                group.opcode,
                group.recursion_desired,
                &group.questions,
                rcode,
            ),
            rcode,
        }
    }

    fn local_reply(
        &mut self,
        client: SocketAddr,
        header: &Header,
        questions: &[Question],
        rcode: ResponseCode,
    ) -> Dispatch {
        self.stats.local_replies += 1;
        Dispatch::Client(ClientReply {
            to: client,
            client_id: header.id,
            payload: error_reply(
                header.id,
                header.flags.opcode,
                header.flags.rd,
                questions,
                rcode,
            ),
            rcode,
        })
    }
}

/// Single-question query reusing the client's OPCODE and RD bit.
fn sub_query(generated_id: u16, header: &Header, question: &Question) -> Result<Vec<u8>, DomainError> {
    let flags = Flags {
        opcode: header.flags.opcode,
        rd: header.flags.rd,
        ..Flags::default()
    };
    let header = Header {
        question_count: 1,
        ..Header::new(generated_id, flags)
    };
    encode_message(&header, std::slice::from_ref(question), &[])
}
