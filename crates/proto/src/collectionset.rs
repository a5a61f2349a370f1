//! 性能指标采集集合
//!
//! 对应 OpenNMS `collectionset.proto`，metric 类型 topic 的负载。

use serde::Serialize;

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct StringAttribute {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct NumericAttribute {
    #[prost(string, tag = "1")]
    pub group: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(double, tag = "3")]
    pub value: f64,
    #[prost(enumeration = "numeric_attribute::Type", tag = "4")]
    pub r#type: i32,
}

pub mod numeric_attribute {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Gauge = 0,
        Counter = 1,
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct NodeLevelResource {
    #[prost(int64, tag = "1")]
    pub node_id: i64,
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
pub struct InterfaceLevelResource {
    #[prost(message, optional, tag = "1")]
    pub node: Option<NodeLevelResource>,
    #[prost(string, tag = "2")]
    pub instance: String,
    #[prost(int32, tag = "3")]
    pub if_index: i32,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct GenericTypeResource {
    #[prost(message, optional, tag = "1")]
    pub node: Option<NodeLevelResource>,
    #[prost(string, tag = "2")]
    pub r#type: String,
    #[prost(string, tag = "3")]
    pub instance: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct ResponseTimeResource {
    #[prost(string, tag = "1")]
    pub instance: String,
    #[prost(string, tag = "2")]
    pub location: String,
}

/// 单个资源及其属性，资源层级由 oneof 区分
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct CollectionSetResource {
    #[prost(oneof = "collection_set_resource::Resource", tags = "1, 2, 3, 4")]
    pub resource: Option<collection_set_resource::Resource>,
    #[prost(message, repeated, tag = "10")]
    pub string: Vec<StringAttribute>,
    #[prost(message, repeated, tag = "11")]
    pub numeric: Vec<NumericAttribute>,
}

pub mod collection_set_resource {
    use serde::Serialize;

    #[derive(Clone, PartialEq, ::prost::Oneof, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Resource {
        #[prost(message, tag = "1")]
        Node(super::NodeLevelResource),
        #[prost(message, tag = "2")]
        Interface(super::InterfaceLevelResource),
        #[prost(message, tag = "3")]
        Generic(super::GenericTypeResource),
        #[prost(message, tag = "4")]
        Response(super::ResponseTimeResource),
    }
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct CollectionSet {
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    #[prost(message, repeated, tag = "2")]
    pub resource: Vec<CollectionSetResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_attribute_renders_value_and_type() {
        let set = CollectionSet {
            timestamp: 1_700_000_000_000,
            resource: vec![CollectionSetResource {
                resource: Some(collection_set_resource::Resource::Node(NodeLevelResource {
                    node_id: 1,
                    ..Default::default()
                })),
                string: vec![],
                numeric: vec![NumericAttribute {
                    group: "mib2-tcp".to_string(),
                    name: "tcpActiveOpens".to_string(),
                    value: 42.5,
                    r#type: numeric_attribute::Type::Counter as i32,
                }],
            }],
        };

        let json = serde_json::to_value(&set).unwrap();
        let resource = &json["resource"][0];
        assert_eq!(resource["resource"]["node"]["node_id"], 1);
        assert_eq!(resource["numeric"][0]["value"], 42.5);
        assert_eq!(resource["numeric"][0]["type"], 1);
    }
}
