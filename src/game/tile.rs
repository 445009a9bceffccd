//! 方塊定義
//!
//! 方塊在佈局生成時一次性建立，之後只有兩類變動：
//! 遮擋解析器重算 `accessible` / `visible` 旗標，以及被拾取後從槽位移除。

use serde_json::{json, Value};

use super::constants::TILE_SIZE;

/// 棋盤上的一個方塊
#[derive(Clone, Debug)]
pub struct Tile {
    pub icon: usize,
    pub offset: i32,
    pub row: i32,
    pub column: i32,
    /// 左上角像素座標，offset 造成部分堆疊
    pub x: i32,
    pub y: i32,
    pub grid_x: i32,
    pub grid_y: i32,
    /// 未被任何更高層方塊覆蓋
    pub accessible: bool,
    /// 本回合可被拾取（遮擋規則判定）
    pub visible: bool,
}

impl Tile {
    pub fn new(icon: usize, offset: i32, row: i32, column: i32) -> Self {
        let x = column * TILE_SIZE + offset;
        let y = row * TILE_SIZE + offset;
        Self {
            icon,
            offset,
            row,
            column,
            x,
            y,
            grid_x: x.rem_euclid(25),
            grid_y: y.rem_euclid(25),
            accessible: true,
            visible: true,
        }
    }

    /// 兩個 100x100 足跡在兩個軸向上都相交
    pub fn overlaps(&self, other: &Tile) -> bool {
        !(other.x + TILE_SIZE <= self.x
            || other.x >= self.x + TILE_SIZE
            || other.y + TILE_SIZE <= self.y
            || other.y >= self.y + TILE_SIZE)
    }

    /// 給 UI 渲染用的 JSON（uid = 槽位索引，整局穩定）
    pub fn to_json(&self, uid: usize) -> Value {
        json!({
            "icon": self.icon,
            "uid": uid,
            "x": self.x,
            "y": self.y,
            "offset": self.offset,
            "row": self.row,
            "column": self.column,
            "accessible": self.accessible as i32,
            "visible": self.visible as i32,
        })
    }
}
