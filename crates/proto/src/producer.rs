//! OpenNMS Kafka Producer 模型
//!
//! 对应 `org.opennms.features.kafka.producer.model`：事件、告警、节点和拓扑边。

use serde::Serialize;

/// 告警/事件严重级别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Severity {
    Indeterminate = 0,
    Cleared = 1,
    Normal = 2,
    Warning = 3,
    Minor = 4,
    Major = 5,
    Critical = 6,
}

/// 节点定位信息，事件、告警和拓扑端口通过它引用节点
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct NodeCriteria {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub foreign_source: String,
    #[prost(string, tag = "3")]
    pub foreign_id: String,
    #[prost(string, tag = "4")]
    pub node_label: String,
    #[prost(string, tag = "5")]
    pub location: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct EventParameter {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(string, tag = "3")]
    pub r#type: String,
}

/// SNMP Trap 来源信息
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct SnmpInfo {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(uint32, tag = "3")]
    pub specific: u32,
    #[prost(uint32, tag = "4")]
    pub generic: u32,
    #[prost(string, tag = "5")]
    pub community: String,
    #[prost(string, tag = "6")]
    pub trap_oid: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct Event {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub uei: String,
    #[prost(string, tag = "3")]
    pub label: String,
    #[prost(uint64, tag = "4")]
    pub time: u64,
    #[prost(string, tag = "5")]
    pub source: String,
    #[prost(message, repeated, tag = "6")]
    pub parameter: Vec<EventParameter>,
    #[prost(uint64, tag = "7")]
    pub create_time: u64,
    #[prost(string, tag = "8")]
    pub description: String,
    #[prost(string, tag = "9")]
    pub log_message: String,
    #[prost(enumeration = "Severity", tag = "10")]
    pub severity: i32,
    #[prost(bool, tag = "11")]
    pub log: bool,
    #[prost(bool, tag = "12")]
    pub display: bool,
    #[prost(message, optional, tag = "13")]
    pub node_criteria: Option<NodeCriteria>,
    #[prost(string, tag = "14")]
    pub ip_address: String,
    #[prost(string, tag = "15")]
    pub dist_poller: String,
    #[prost(message, optional, tag = "16")]
    pub snmp_info: Option<SnmpInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct Alarm {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub uei: String,
    #[prost(message, optional, tag = "3")]
    pub node_criteria: Option<NodeCriteria>,
    #[prost(string, tag = "4")]
    pub ip_address: String,
    #[prost(string, tag = "5")]
    pub service_name: String,
    #[prost(string, tag = "6")]
    pub reduction_key: String,
    #[prost(enumeration = "alarm::Type", tag = "7")]
    pub r#type: i32,
    #[prost(uint64, tag = "8")]
    pub count: u64,
    #[prost(enumeration = "Severity", tag = "9")]
    pub severity: i32,
    #[prost(uint64, tag = "10")]
    pub first_event_time: u64,
    #[prost(string, tag = "11")]
    pub description: String,
    #[prost(string, tag = "12")]
    pub log_message: String,
    #[prost(string, tag = "13")]
    pub ack_user: String,
    #[prost(uint64, tag = "14")]
    pub ack_time: u64,
    #[prost(message, optional, tag = "15")]
    pub last_event: Option<Event>,
    #[prost(uint64, tag = "16")]
    pub last_event_time: u64,
    #[prost(uint32, tag = "17")]
    pub if_index: u32,
    #[prost(string, tag = "18")]
    pub operator_instructions: String,
    #[prost(string, tag = "19")]
    pub clear_key: String,
    #[prost(string, tag = "20")]
    pub managed_object_instance: String,
    #[prost(string, tag = "21")]
    pub managed_object_type: String,
    /// 情景告警（situation）关联的子告警
    #[prost(message, repeated, tag = "22")]
    pub related_alarm: Vec<Alarm>,
    #[prost(string, tag = "23")]
    pub trouble_ticket_id: String,
    #[prost(enumeration = "alarm::TroubleTicketState", tag = "24")]
    pub trouble_ticket_state: i32,
}

pub mod alarm {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        ProblemWithoutClear = 0,
        ProblemWithClear = 1,
        Clear = 2,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum TroubleTicketState {
        Open = 0,
        CreatePending = 1,
        CreateFailed = 2,
        UpdatePending = 3,
        UpdateFailed = 4,
        Closed = 5,
        ClosePending = 6,
        CloseFailed = 7,
        Resolved = 8,
        ResolvePending = 9,
        ResolveFailed = 10,
        Cancelled = 11,
        CancelPending = 12,
        CancelFailed = 13,
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct IpInterface {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub ip_address: String,
    #[prost(uint32, tag = "3")]
    pub if_index: u32,
    #[prost(string, tag = "4")]
    pub primary_type: String,
    #[prost(string, repeated, tag = "5")]
    pub service: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct SnmpInterface {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(uint32, tag = "2")]
    pub if_index: u32,
    #[prost(string, tag = "3")]
    pub if_descr: String,
    #[prost(uint32, tag = "4")]
    pub if_type: u32,
    #[prost(string, tag = "5")]
    pub if_name: String,
    #[prost(uint64, tag = "6")]
    pub if_speed: u64,
    #[prost(string, tag = "7")]
    pub if_phys_address: String,
    #[prost(uint32, tag = "8")]
    pub if_admin_status: u32,
    #[prost(uint32, tag = "9")]
    pub if_oper_status: u32,
    #[prost(string, tag = "10")]
    pub if_alias: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct HwAlias {
    #[prost(int32, tag = "1")]
    pub index: i32,
    #[prost(string, tag = "2")]
    pub oid: String,
}

/// ENTITY-MIB 硬件清单，children 递归描述子实体
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct HwEntity {
    #[prost(int32, tag = "1")]
    pub ent_physical_index: i32,
    #[prost(string, tag = "2")]
    pub ent_phys_class: String,
    #[prost(string, tag = "3")]
    pub ent_phys_descr: String,
    #[prost(bool, tag = "4")]
    pub ent_phys_is_fru: bool,
    #[prost(string, tag = "5")]
    pub ent_phys_name: String,
    #[prost(string, tag = "6")]
    pub ent_phys_vendor_type: String,
    #[prost(message, repeated, tag = "7")]
    pub ent_hw_alias: Vec<HwAlias>,
    #[prost(message, repeated, tag = "8")]
    pub children: Vec<HwEntity>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct Node {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub foreign_source: String,
    #[prost(string, tag = "3")]
    pub foreign_id: String,
    #[prost(string, tag = "4")]
    pub location: String,
    #[prost(string, repeated, tag = "5")]
    pub category: Vec<String>,
    #[prost(string, tag = "6")]
    pub label: String,
    #[prost(uint64, tag = "7")]
    pub create_time: u64,
    #[prost(string, tag = "8")]
    pub sys_contact: String,
    #[prost(string, tag = "9")]
    pub sys_description: String,
    #[prost(string, tag = "10")]
    pub sys_object_id: String,
    #[prost(message, repeated, tag = "11")]
    pub ip_interface: Vec<IpInterface>,
    #[prost(message, repeated, tag = "12")]
    pub snmp_interface: Vec<SnmpInterface>,
    #[prost(message, optional, tag = "13")]
    pub hw_inventory: Option<HwEntity>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TopologyRef {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "topology_ref::Protocol", tag = "2")]
    pub protocol: i32,
}

pub mod topology_ref {
    /// 拓扑发现协议
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Protocol {
        Lldp = 0,
        Ospf = 1,
        Isis = 2,
        Bridge = 3,
        Cdp = 4,
        Userdefined = 5,
        Nodes = 6,
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TopologyPort {
    #[prost(string, tag = "1")]
    pub vertex_id: String,
    #[prost(uint64, tag = "2")]
    pub if_index: u64,
    #[prost(string, tag = "3")]
    pub if_name: String,
    #[prost(string, tag = "4")]
    pub address: String,
    #[prost(message, optional, tag = "5")]
    pub node_criteria: Option<NodeCriteria>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TopologySegment {
    #[prost(message, optional, tag = "1")]
    pub r#ref: Option<TopologyRef>,
}

/// 拓扑边：source 端口指向另一端口、网段或节点
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TopologyEdge {
    #[prost(message, optional, tag = "1")]
    pub r#ref: Option<TopologyRef>,
    #[prost(message, optional, tag = "2")]
    pub source: Option<TopologyPort>,
    #[prost(oneof = "topology_edge::Target", tags = "3, 4, 5")]
    pub target: Option<topology_edge::Target>,
}

pub mod topology_edge {
    use serde::Serialize;

    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Target {
        #[prost(message, tag = "3")]
        TargetPort(super::TopologyPort),
        #[prost(message, tag = "4")]
        TargetSegment(super::TopologySegment),
        #[prost(message, tag = "5")]
        TargetNode(super::NodeCriteria),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_alarm_wire_round_trip_keeps_nested_event() {
        let alarm = Alarm {
            id: 7,
            uei: "uei.opennms.org/nodes/nodeDown".to_string(),
            severity: Severity::Major as i32,
            r#type: alarm::Type::ProblemWithClear as i32,
            last_event: Some(Event {
                id: 99,
                uei: "uei.opennms.org/nodes/nodeDown".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let decoded = Alarm::decode(alarm.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, alarm);
        assert_eq!(decoded.severity(), Severity::Major);
        assert_eq!(decoded.last_event.unwrap().id, 99);
    }

    #[test]
    fn test_topology_edge_target_serializes_snake_case() {
        let edge = TopologyEdge {
            r#ref: Some(TopologyRef {
                id: "edge-1".to_string(),
                protocol: topology_ref::Protocol::Lldp as i32,
            }),
            source: None,
            target: Some(topology_edge::Target::TargetNode(NodeCriteria {
                id: 3,
                ..Default::default()
            })),
        };

        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["ref"]["id"], "edge-1");
        assert_eq!(json["target"]["target_node"]["id"], 3);
    }
}
