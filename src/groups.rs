//! Consumer-group listing.
//!
//! The native group list and every buffer inside it are only valid until the
//! list is destroyed, so members are copied and their metadata/assignment
//! payloads decoded before returning. A payload that fails to decode is kept
//! as an error on its member; the rest of the listing is unaffected.

use std::ffi::CString;
use std::ptr;
use std::time::Duration;

use rdkafka::bindings as rdsys;
use rdkafka::bindings::rd_kafka_resp_err_t;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{DecodeError, KafkaClientError, Result};
use crate::handle::OwnedHandle;
use crate::protocol::{decode_assignment, decode_metadata, MemberAssignment, MemberMetadata};
use crate::util::{check_err, cstr_to_owned, err2string, native_slice, timeout_ms};

/// One group member with its payloads copied out of the native list.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub member_id: String,
    pub client_id: String,
    pub client_host: String,
    pub metadata_bytes: Vec<u8>,
    pub assignment_bytes: Vec<u8>,
    pub metadata: std::result::Result<MemberMetadata, DecodeError>,
    pub assignment: std::result::Result<MemberAssignment, DecodeError>,
}

#[derive(Debug, Clone)]
pub struct GroupInfo {
    pub name: String,
    pub state: String,
    pub protocol_type: String,
    pub protocol: String,
    /// Broker-reported error for this group; members are empty when set.
    pub error: Option<String>,
    pub members: Vec<GroupMember>,
}

unsafe extern "C" fn destroy_group_list(list: *mut rdsys::rd_kafka_group_list) {
    rdsys::rd_kafka_group_list_destroy(list);
}

impl GroupMember {
    unsafe fn from_native(member: &rdsys::rd_kafka_group_member_info) -> Self {
        let member_id = cstr_to_owned(member.member_id);
        let metadata_bytes =
            native_slice(member.member_metadata as *const u8, member.member_metadata_size).to_vec();
        let assignment_bytes =
            native_slice(member.member_assignment as *const u8, member.member_assignment_size)
                .to_vec();

        let metadata = decode_metadata(&metadata_bytes);
        if let Err(err) = &metadata {
            warn!(member = %member_id, error = %err, "undecodable member metadata");
        }
        let assignment = decode_assignment(&assignment_bytes);
        if let Err(err) = &assignment {
            warn!(member = %member_id, error = %err, "undecodable member assignment");
        }

        Self {
            member_id,
            client_id: cstr_to_owned(member.client_id),
            client_host: cstr_to_owned(member.client_host),
            metadata_bytes,
            assignment_bytes,
            metadata,
            assignment,
        }
    }
}

impl GroupInfo {
    unsafe fn from_native(group: &rdsys::rd_kafka_group_info) -> Self {
        let name = cstr_to_owned(group.group);
        let error = (group.err != rd_kafka_resp_err_t::RD_KAFKA_RESP_ERR_NO_ERROR)
            .then(|| err2string(group.err));
        let members = match &error {
            Some(err) => {
                warn!(group = %name, error = %err, "group reported an error");
                Vec::new()
            }
            None => {
                let members = group.members as *const rdsys::rd_kafka_group_member_info;
                native_slice(members, group.member_cnt)
                    .iter()
                    .map(|m| GroupMember::from_native(m))
                    .collect()
            }
        };
        Self {
            name,
            state: cstr_to_owned(group.state),
            protocol_type: cstr_to_owned(group.protocol_type),
            protocol: cstr_to_owned(group.protocol),
            error,
            members,
        }
    }
}

/// List `group`, or all groups when `None`.
pub fn list_groups(client: &Client, group: Option<&str>, timeout: Duration) -> Result<Vec<GroupInfo>> {
    let group_c = group
        .map(CString::new)
        .transpose()
        .map_err(|_| KafkaClientError::InvalidArgument("group name contains a NUL byte".into()))?;

    let mut list_ptr: *const rdsys::rd_kafka_group_list = ptr::null();
    let err = unsafe {
        rdsys::rd_kafka_list_groups(
            client.native_ptr(),
            group_c.as_ref().map_or(ptr::null(), |g| g.as_ptr()),
            &mut list_ptr,
            timeout_ms(timeout),
        )
    };
    check_err("list_groups", err)?;

    let list = unsafe {
        OwnedHandle::from_raw(list_ptr as *mut rdsys::rd_kafka_group_list, destroy_group_list)
    };
    if list.is_null() {
        return Ok(Vec::new());
    }
    let groups: Vec<GroupInfo> = unsafe {
        let native = &*list.get();
        native_slice(native.groups as *const rdsys::rd_kafka_group_info, native.group_cnt)
            .iter()
            .map(|g| GroupInfo::from_native(g))
            .collect()
    };
    debug!(count = groups.len(), "listed consumer groups");
    Ok(groups)
}
