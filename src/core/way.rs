//! Way record (`OSMWay`)
//!
//! Layout (320 bytes, align 8):
//!
//! | offset  | storage   | content                                    |
//! |---------|-----------|--------------------------------------------|
//! | 0       | u64       | id                                         |
//! | 8..292  | 71 × u32  | string-table indices, then `duration`      |
//! | 292     | u32       | [`WayAttributes`]                          |
//! | 296     | u32       | [`WayClassification`]                      |
//! | 300     | u16       | [`WayAccess`]                              |
//! | 302     | u16       | [`WayBikeAttributes`]                      |
//! | 304     | u16       | node_count                                 |
//! | 306     | 7 × u8    | speed_limit .. truck_speed_backward        |
//! | 313     | i8        | layer                                      |
//! | 314     | 6 bytes   | tail padding, always zero                  |

use bytemuck::{Pod, Zeroable};

use super::bits::bit_group;
use super::record::Record;

/// Surface code for compacted ground.
pub const SURFACE_COMPACTED: u8 = 3;
/// Road class code for service and other minor roads.
pub const ROAD_CLASS_SERVICE_OTHER: u8 = 7;
/// Use code for footways.
pub const USE_FOOTWAY: u8 = 25;
/// Speed in km/h given to ways built by [`OsmWay::with_modes`].
pub const DEFAULT_SPEED_KPH: u8 = 25;

bit_group! {
    /// Traffic and physical attributes.
    pub struct WayAttributes(u32) {
        destination_only, set_destination_only: bool = 0, 1;
        no_thru_traffic, set_no_thru_traffic: bool = 1, 1;
        oneway, set_oneway: bool = 2, 1;
        oneway_reverse, set_oneway_reverse: bool = 3, 1;
        roundabout, set_roundabout: bool = 4, 1;
        ferry, set_ferry: bool = 5, 1;
        rail, set_rail: bool = 6, 1;
        surface, set_surface: u8 = 7, 3;
        tunnel, set_tunnel: bool = 10, 1;
        toll, set_toll: bool = 11, 1;
        bridge, set_bridge: bool = 12, 1;
        seasonal, set_seasonal: bool = 13, 1;
        drive_on_right, set_drive_on_right: bool = 14, 1;
        /// National/regional/local/mountain network membership mask.
        bike_network, set_bike_network: u8 = 15, 4;
        exit, set_exit: bool = 19, 1;
        tagged_speed, set_tagged_speed: bool = 20, 1;
        forward_tagged_speed, set_forward_tagged_speed: bool = 21, 1;
        backward_tagged_speed, set_backward_tagged_speed: bool = 22, 1;
        tagged_lanes, set_tagged_lanes: bool = 23, 1;
        forward_tagged_lanes, set_forward_tagged_lanes: bool = 24, 1;
        backward_tagged_lanes, set_backward_tagged_lanes: bool = 25, 1;
        truck_route, set_truck_route: bool = 26, 1;
        sidewalk_right, set_sidewalk_right: bool = 27, 1;
        sidewalk_left, set_sidewalk_left: bool = 28, 1;
        /// SAC hiking scale.
        sac_scale, set_sac_scale: u8 = 29, 3;
    }
}

bit_group! {
    /// Classification, lane counts and pedestrian-related flags.
    pub struct WayClassification(u32) {
        /// Importance of the road or path.
        road_class, set_road_class: u8 = 0, 3;
        /// Ramp or turn channel.
        link, set_link: bool = 3, 1;
        /// Use / form code.
        way_use, set_way_use: u8 = 4, 6;
        lanes, set_lanes: u8 = 10, 4;
        forward_lanes, set_forward_lanes: u8 = 14, 4;
        backward_lanes, set_backward_lanes: u8 = 18, 4;
        /// Turn channel that is not a ramp.
        turn_channel, set_turn_channel: bool = 22, 1;
        wheelchair, set_wheelchair: bool = 23, 1;
        wheelchair_tag, set_wheelchair_tag: bool = 24, 1;
        has_user_tags, set_has_user_tags: bool = 25, 1;
        has_pronunciation_tags, set_has_pronunciation_tags: bool = 26, 1;
        internal, set_internal: bool = 27, 1;
        hov_type, set_hov_type: bool = 28, 1;
        indoor, set_indoor: bool = 29, 1;
        pedestrian_forward, set_pedestrian_forward: bool = 30, 1;
        pedestrian_backward, set_pedestrian_backward: bool = 31, 1;
    }
}

bit_group! {
    /// Per-mode access, forward direction in the low byte and backward in the high byte.
    pub struct WayAccess(u16) {
        auto_forward, set_auto_forward: bool = 0, 1;
        bus_forward, set_bus_forward: bool = 1, 1;
        taxi_forward, set_taxi_forward: bool = 2, 1;
        truck_forward, set_truck_forward: bool = 3, 1;
        motorcycle_forward, set_motorcycle_forward: bool = 4, 1;
        emergency_forward, set_emergency_forward: bool = 5, 1;
        hov_forward, set_hov_forward: bool = 6, 1;
        moped_forward, set_moped_forward: bool = 7, 1;
        auto_backward, set_auto_backward: bool = 8, 1;
        bus_backward, set_bus_backward: bool = 9, 1;
        taxi_backward, set_taxi_backward: bool = 10, 1;
        truck_backward, set_truck_backward: bool = 11, 1;
        motorcycle_backward, set_motorcycle_backward: bool = 12, 1;
        emergency_backward, set_emergency_backward: bool = 13, 1;
        hov_backward, set_hov_backward: bool = 14, 1;
        moped_backward, set_moped_backward: bool = 15, 1;
    }
}

bit_group! {
    /// Attributes specific to cycling.
    pub struct WayBikeAttributes(u16, spare = 2) {
        cycle_lane_right, set_cycle_lane_right: u8 = 0, 2;
        cycle_lane_left, set_cycle_lane_left: u8 = 2, 2;
        cycle_lane_right_opposite, set_cycle_lane_right_opposite: bool = 4, 1;
        cycle_lane_left_opposite, set_cycle_lane_left_opposite: bool = 5, 1;
        shoulder_right, set_shoulder_right: bool = 6, 1;
        shoulder_left, set_shoulder_left: bool = 7, 1;
        dismount, set_dismount: bool = 8, 1;
        use_sidepath, set_use_sidepath: bool = 9, 1;
        bike_forward, set_bike_forward: bool = 10, 1;
        bike_backward, set_bike_backward: bool = 11, 1;
        lit, set_lit: bool = 12, 1;
        destination_only_hgv, set_destination_only_hgv: bool = 13, 1;
    }
}

/// Travel modes allowed on a way built by [`OsmWay::with_modes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TravelModes {
    pub auto: bool,
    pub pedestrian: bool,
}

impl TravelModes {
    pub const PEDESTRIAN: Self = Self {
        auto: false,
        pedestrian: true,
    };
}

/// A path segment with its names and routing attributes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct OsmWay {
    pub id: u64,

    // Reference (highway numbers)
    pub ref_index: u32,
    pub ref_lang_index: u32,
    pub ref_left_index: u32,
    pub ref_left_lang_index: u32,
    pub ref_right_index: u32,
    pub ref_right_lang_index: u32,

    pub int_ref_index: u32,
    pub int_ref_lang_index: u32,
    pub int_ref_left_index: u32,
    pub int_ref_left_lang_index: u32,
    pub int_ref_right_index: u32,
    pub int_ref_right_lang_index: u32,

    // Names
    pub name_index: u32,
    pub name_lang_index: u32,
    pub name_left_index: u32,
    pub name_left_lang_index: u32,
    pub name_right_index: u32,
    pub name_right_lang_index: u32,

    pub name_forward_index: u32,
    pub name_forward_lang_index: u32,
    pub name_backward_index: u32,
    pub name_backward_lang_index: u32,

    pub alt_name_index: u32,
    pub alt_name_lang_index: u32,
    pub alt_name_left_index: u32,
    pub alt_name_left_lang_index: u32,
    pub alt_name_right_index: u32,
    pub alt_name_right_lang_index: u32,

    pub official_name_index: u32,
    pub official_name_lang_index: u32,
    pub official_name_left_index: u32,
    pub official_name_left_lang_index: u32,
    pub official_name_right_index: u32,
    pub official_name_right_lang_index: u32,

    pub tunnel_name_index: u32,
    pub tunnel_name_lang_index: u32,
    pub tunnel_name_left_index: u32,
    pub tunnel_name_left_lang_index: u32,
    pub tunnel_name_right_index: u32,
    pub tunnel_name_right_lang_index: u32,

    // Turn lanes
    pub fwd_turn_lanes_index: u32,
    pub bwd_turn_lanes_index: u32,

    // Guidance views
    pub fwd_jct_base_index: u32,
    pub bwd_jct_base_index: u32,
    pub fwd_jct_overlay_index: u32,
    pub bwd_jct_overlay_index: u32,
    pub fwd_signboard_base_index: u32,
    pub bwd_signboard_base_index: u32,

    // Sign destinations
    pub destination_index: u32,
    pub destination_lang_index: u32,
    pub destination_forward_index: u32,
    pub destination_backward_index: u32,
    pub destination_forward_lang_index: u32,
    pub destination_backward_lang_index: u32,
    pub destination_ref_index: u32,
    pub destination_ref_lang_index: u32,
    pub destination_ref_to_index: u32,
    pub destination_ref_to_lang_index: u32,
    pub destination_int_ref_index: u32,
    pub destination_int_ref_to_index: u32,
    pub destination_street_index: u32,
    pub destination_street_lang_index: u32,
    pub destination_street_to_index: u32,
    pub destination_street_to_lang_index: u32,
    pub junction_name_index: u32,
    pub junction_name_lang_index: u32,
    pub junction_ref_index: u32,
    pub junction_ref_lang_index: u32,

    // level and level:ref
    pub level_index: u32,
    pub level_ref_index: u32,

    /// Ferry duration in seconds.
    pub duration: u32,

    pub attributes: WayAttributes,
    pub classification: WayClassification,
    pub access: WayAccess,
    pub bike: WayBikeAttributes,

    pub node_count: u16,

    /// Posted maximum speed, km/h.
    pub speed_limit: u8,
    /// Average, advisory, maximum or categorized speed, first one known, km/h.
    pub speed: u8,
    pub backward_speed: u8,
    pub forward_speed: u8,
    pub truck_speed: u8,
    pub truck_speed_forward: u8,
    pub truck_speed_backward: u8,

    /// Z-level relative to crossing ways.
    pub layer: i8,

    padding: [u8; 6],
}

impl OsmWay {
    /// Pedestrian way with the fixed default profile.
    ///
    /// Only `id`, `name_index` and `node_count` come from the caller. On top of
    /// a zeroed record this sets surface = compacted, drive on right, road class
    /// = service/other, use = footway, pedestrian access in both directions and
    /// a speed of 25 km/h. Every other field stays zero.
    pub fn pedestrian(id: u64, name_index: u32, node_count: u16) -> Self {
        Self::with_modes(id, name_index, node_count, TravelModes::PEDESTRIAN)
    }

    /// Same profile as [`OsmWay::pedestrian`], with pedestrian and auto access
    /// (both directions) set according to `modes`.
    pub fn with_modes(id: u64, name_index: u32, node_count: u16, modes: TravelModes) -> Self {
        let mut way = Self::zeroed();
        way.id = id;
        way.name_index = name_index;
        way.node_count = node_count;

        way.attributes.set_surface(SURFACE_COMPACTED);
        way.attributes.set_drive_on_right(true);
        way.classification.set_road_class(ROAD_CLASS_SERVICE_OTHER);
        way.classification.set_way_use(USE_FOOTWAY);
        way.classification.set_has_user_tags(false);

        if modes.pedestrian {
            way.classification.set_pedestrian_forward(true);
            way.classification.set_pedestrian_backward(true);
        }
        if modes.auto {
            way.access.set_auto_forward(true);
            way.access.set_auto_backward(true);
        }

        way.speed = DEFAULT_SPEED_KPH;
        way
    }
}

impl Record for OsmWay {
    const NAME: &'static str = "way";
    const FILE_NAME: &'static str = "ways.bin";
}

const _: () = assert!(std::mem::size_of::<OsmWay>() == 320);
const _: () = assert!(std::mem::align_of::<OsmWay>() == 8);
