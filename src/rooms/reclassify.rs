//! Junction pass: rooms that ended up with exactly two neighbors get the
//! corridor or bend variant matching the two directions they connect.

use tracing::{debug, info};

use super::{RoomArchetype, RoomGraph};

/// Retag every room with exactly two occupied neighbors. Returns how many
/// rooms were retagged. Rooms with 0, 1, 3 or 4 connections are left alone,
/// and running the pass again changes nothing.
pub fn reclassify(graph: &mut RoomGraph) -> usize {
    let mut retagged = 0;

    for index in 0..graph.room_count() {
        let room = graph.room(index);
        let connections = graph.occupied_neighbors(room.x, room.y);
        let Some(archetype) = RoomArchetype::junction(connections) else {
            continue;
        };

        debug!(
            x = room.x,
            y = room.y,
            from = room.archetype.name(),
            to = archetype.name(),
            "retagging junction room"
        );
        graph.set_archetype(index, archetype);
        graph.open_doors(index);
        retagged += 1;
    }

    info!(retagged, rooms = graph.room_count(), "junction pass complete");
    retagged
}
