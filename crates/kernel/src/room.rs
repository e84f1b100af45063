use escape_common::{Rgb, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const ROOM_SIZE: f32 = 10.0;
const WALL_THICKNESS: f32 = 0.5;
const WALL_Y: f32 = 1.0;
const WALL_COLOR: Rgb = Vec3::new(0.6, 0.6, 0.7);

const BUTTON_SIZE: f32 = 0.4;
const BUTTON_Y: f32 = 1.5;
const BUTTON_SIDE_X: f32 = 8.5;
const BUTTON_BACK_Z: f32 = -9.5;

const DOOR_POSITION: Vec3 = Vec3::new(0.0, 1.0, ROOM_SIZE);
const DOOR_WIDTH: f32 = 2.0;
const DOOR_HEIGHT: f32 = 3.0;

const PLAYER_START: Vec3 = Vec3::new(0.0, 1.6, 8.0);

/// One static box of the room shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPiece {
    pub transform: Transform,
    pub color: Rgb,
}

/// The ground plane under the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloorPlane {
    pub y: f32,
    pub half_extent: f32,
    pub color: Rgb,
}

/// Fixed placement of everything in the level. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLayout {
    walls: Vec<WallPiece>,
    floor: FloorPlane,
    button_positions: Vec<Vec3>,
    button_size: f32,
    door_position: Vec3,
    door_width: f32,
    door_height: f32,
    player_start: Vec3,
}

impl RoomLayout {
    /// The single hardcoded escape room: a 20x20 box with a button on the
    /// left, right and back walls and the exit in the front wall.
    pub fn standard() -> Self {
        let wall = |position: Vec3, scale: Vec3| WallPiece {
            transform: Transform::from_position_scale(position, scale),
            color: WALL_COLOR,
        };

        let walls = vec![
            // front wall, split around the door gap, plus the lintel
            wall(
                Vec3::new(-6.0, WALL_Y, ROOM_SIZE),
                Vec3::new(6.0, 5.0, WALL_THICKNESS),
            ),
            wall(
                Vec3::new(6.0, WALL_Y, ROOM_SIZE),
                Vec3::new(6.0, 5.0, WALL_THICKNESS),
            ),
            wall(
                Vec3::new(0.0, 3.5, ROOM_SIZE),
                Vec3::new(20.0, 1.0, WALL_THICKNESS),
            ),
            // back
            wall(
                Vec3::new(0.0, WALL_Y, -ROOM_SIZE),
                Vec3::new(20.0, 6.0, WALL_THICKNESS),
            ),
            // left, right
            wall(
                Vec3::new(-ROOM_SIZE + 1.0, WALL_Y, 0.0),
                Vec3::new(WALL_THICKNESS, 6.0, 20.0),
            ),
            wall(
                Vec3::new(ROOM_SIZE - 1.0, WALL_Y, 0.0),
                Vec3::new(WALL_THICKNESS, 6.0, 20.0),
            ),
        ];

        Self {
            walls,
            floor: FloorPlane {
                y: -1.0,
                half_extent: 15.0,
                color: Vec3::new(0.4, 0.4, 0.4),
            },
            button_positions: vec![
                Vec3::new(-BUTTON_SIDE_X, BUTTON_Y, 0.0),
                Vec3::new(BUTTON_SIDE_X, BUTTON_Y, 0.0),
                Vec3::new(0.0, BUTTON_Y, BUTTON_BACK_Z),
            ],
            button_size: BUTTON_SIZE,
            door_position: DOOR_POSITION,
            door_width: DOOR_WIDTH,
            door_height: DOOR_HEIGHT,
            player_start: PLAYER_START,
        }
    }

    /// Static wall boxes, read-only for rendering.
    pub fn walls(&self) -> &[WallPiece] {
        &self.walls
    }

    /// The ground plane under the room.
    pub fn floor(&self) -> &FloorPlane {
        &self.floor
    }

    /// Button centers in layout order.
    pub fn button_positions(&self) -> &[Vec3] {
        &self.button_positions
    }

    /// Edge length shared by every button.
    pub fn button_size(&self) -> f32 {
        self.button_size
    }

    /// Center of the exit door.
    pub fn door_position(&self) -> Vec3 {
        self.door_position
    }

    /// Door `(width, height)`.
    pub fn door_size(&self) -> (f32, f32) {
        (self.door_width, self.door_height)
    }

    /// Eye position the player spawns at. Its `y` is the eye height.
    pub fn player_start(&self) -> Vec3 {
        self.player_start
    }
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self::standard()
    }
}
