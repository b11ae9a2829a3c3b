//! SOAP operation dispatch
//!
//! Parameters are child elements of the operation element with lowerCamel names. For updates an
//! absent element leaves the field unchanged; song lists are `<songIds><songId>..</songId></songIds>`.

use streamcat_common::{
    Catalog, CatalogError, CatalogResult, NewPlaylist, NewSong, NewUser, Playlist,
    PlaylistDetails, PlaylistOps, PlaylistPatch, QueryOps, Song, SongOps, SongPatch, Statistics,
    User, UserOps, UserPatch,
};

use super::envelope::{XmlElement, XmlWriter};

// ============================================================================
// Parameter extraction
// ============================================================================

fn text(params: &XmlElement, element: &str) -> Option<String> {
    params.child(element).map(|e| e.text.clone())
}

/// `field` is the canonical name reported when the element is missing
fn required(params: &XmlElement, element: &str, field: &str) -> CatalogResult<String> {
    text(params, element).ok_or_else(|| CatalogError::validation(field, "is required"))
}

fn integer(params: &XmlElement, element: &str, field: &str) -> CatalogResult<Option<i64>> {
    text(params, element)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| CatalogError::validation(field, "must be an integer"))
        })
        .transpose()
}

fn required_integer(params: &XmlElement, element: &str, field: &str) -> CatalogResult<i64> {
    integer(params, element, field)?.ok_or_else(|| CatalogError::validation(field, "is required"))
}

/// `<songIds>` may only hold `<songId>` elements
fn song_ids(params: &XmlElement) -> CatalogResult<Option<Vec<String>>> {
    let Some(list) = params.child("songIds") else {
        return Ok(None);
    };
    if !list.text.is_empty() {
        return Err(CatalogError::validation(
            "song_ids",
            "songIds must contain songId elements, not text",
        ));
    }
    list.children
        .iter()
        .map(|c| {
            if c.name == "songId" {
                Ok(c.text.clone())
            } else {
                Err(CatalogError::validation(
                    "song_ids",
                    format!("unexpected element <{}> in songIds", c.name),
                ))
            }
        })
        .collect::<CatalogResult<Vec<_>>>()
        .map(Some)
}

// ============================================================================
// Payload writing
// ============================================================================

fn write_user(w: &mut XmlWriter, tag: &str, user: &User) {
    w.open(tag)
        .leaf("id", &user.id)
        .leaf("name", &user.name)
        .leaf("age", user.age)
        .close(tag);
}

fn write_song(w: &mut XmlWriter, song: &Song) {
    w.open("song")
        .leaf("id", &song.id)
        .leaf("name", &song.name)
        .leaf("artist", &song.artist)
        .leaf("durationSeconds", song.duration_seconds)
        .close("song");
}

fn write_playlist(w: &mut XmlWriter, playlist: &Playlist) {
    w.open("playlist")
        .leaf("id", &playlist.id)
        .leaf("name", &playlist.name)
        .leaf("ownerId", &playlist.owner_id)
        .open("songIds");
    for id in &playlist.song_ids {
        w.leaf("songId", id);
    }
    w.close("songIds").close("playlist");
}

fn users(list: &[User]) -> String {
    let mut w = XmlWriter::new();
    w.open("users");
    for user in list {
        write_user(&mut w, "user", user);
    }
    w.close("users");
    w.finish()
}

fn songs(list: &[Song]) -> String {
    let mut w = XmlWriter::new();
    w.open("songs");
    for song in list {
        write_song(&mut w, song);
    }
    w.close("songs");
    w.finish()
}

fn playlists(list: &[Playlist]) -> String {
    let mut w = XmlWriter::new();
    w.open("playlists");
    for playlist in list {
        write_playlist(&mut w, playlist);
    }
    w.close("playlists");
    w.finish()
}

fn user(user: &User) -> String {
    let mut w = XmlWriter::new();
    write_user(&mut w, "user", user);
    w.finish()
}

fn song(song: &Song) -> String {
    let mut w = XmlWriter::new();
    write_song(&mut w, song);
    w.finish()
}

fn playlist(playlist: &Playlist) -> String {
    let mut w = XmlWriter::new();
    write_playlist(&mut w, playlist);
    w.finish()
}

fn deleted(flag: bool) -> String {
    let mut w = XmlWriter::new();
    w.leaf("deleted", flag);
    w.finish()
}

fn details(details: &PlaylistDetails) -> String {
    let mut w = XmlWriter::new();
    w.open("playlistDetails");
    write_playlist(&mut w, &details.playlist);
    if let Some(owner) = &details.owner {
        write_user(&mut w, "owner", owner);
    }
    w.open("songs");
    for song in &details.songs {
        write_song(&mut w, song);
    }
    w.close("songs").close("playlistDetails");
    w.finish()
}

fn statistics(stats: &Statistics) -> String {
    let mut w = XmlWriter::new();
    w.open("statistics")
        .leaf("totalUsers", stats.total_users)
        .leaf("totalSongs", stats.total_songs)
        .leaf("totalPlaylists", stats.total_playlists)
        .leaf("avgSongsPerPlaylist", stats.avg_songs_per_playlist)
        .leaf("usersWithPlaylists", stats.users_with_playlists)
        .leaf("avgPlaylistsPerUser", stats.avg_playlists_per_user)
        .close("statistics");
    w.finish()
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run `operation` and return the payload of its response element
pub fn dispatch(
    catalog: &dyn Catalog,
    operation: &str,
    params: &XmlElement,
) -> CatalogResult<String> {
    let id = || required(params, "id", "id");

    match operation {
        "ListUsers" => Ok(users(&catalog.list_users()?)),
        "GetUser" => Ok(user(&catalog.get_user(&id()?)?)),
        "CreateUser" => {
            let input = NewUser {
                name: required(params, "name", "name")?,
                age: required_integer(params, "age", "age")?,
            };
            Ok(user(&catalog.create_user(input)?))
        }
        "UpdateUser" => {
            let patch = UserPatch {
                name: text(params, "name"),
                age: integer(params, "age", "age")?,
            };
            Ok(user(&catalog.update_user(&id()?, patch)?))
        }
        "DeleteUser" => Ok(deleted(catalog.delete_user(&id()?)?)),

        "ListSongs" => Ok(songs(&catalog.list_songs()?)),
        "GetSong" => Ok(song(&catalog.get_song(&id()?)?)),
        "CreateSong" => {
            let input = NewSong {
                name: required(params, "name", "name")?,
                artist: required(params, "artist", "artist")?,
                duration_seconds: required_integer(params, "durationSeconds", "duration_seconds")?,
            };
            Ok(song(&catalog.create_song(input)?))
        }
        "UpdateSong" => {
            let patch = SongPatch {
                name: text(params, "name"),
                artist: text(params, "artist"),
                duration_seconds: integer(params, "durationSeconds", "duration_seconds")?,
            };
            Ok(song(&catalog.update_song(&id()?, patch)?))
        }
        "DeleteSong" => Ok(deleted(catalog.delete_song(&id()?)?)),

        "ListPlaylists" => Ok(playlists(&catalog.list_playlists()?)),
        "GetPlaylist" => Ok(playlist(&catalog.get_playlist(&id()?)?)),
        "CreatePlaylist" => {
            let input = NewPlaylist {
                name: required(params, "name", "name")?,
                owner_id: required(params, "ownerId", "owner_id")?,
                song_ids: song_ids(params)?.unwrap_or_default(),
            };
            Ok(playlist(&catalog.create_playlist(input)?))
        }
        "UpdatePlaylist" => {
            let patch = PlaylistPatch {
                name: text(params, "name"),
                owner_id: text(params, "ownerId"),
                song_ids: song_ids(params)?,
            };
            Ok(playlist(&catalog.update_playlist(&id()?, patch)?))
        }
        "DeletePlaylist" => Ok(deleted(catalog.delete_playlist(&id()?)?)),

        "PlaylistsOfUser" => {
            let user_id = required(params, "userId", "user_id")?;
            Ok(playlists(&catalog.playlists_of_user(&user_id)?))
        }
        "SongsOfPlaylist" => {
            let playlist_id = required(params, "playlistId", "playlist_id")?;
            Ok(songs(&catalog.songs_of_playlist(&playlist_id)?))
        }
        "PlaylistsContainingSong" => {
            let song_id = required(params, "songId", "song_id")?;
            Ok(playlists(&catalog.playlists_containing_song(&song_id)?))
        }
        "PlaylistDetails" => Ok(details(&catalog.playlist_details(&id()?)?)),
        "GetStatistics" => Ok(statistics(&catalog.statistics()?)),

        other => Err(CatalogError::validation(
            "operation",
            format!("unknown operation: {}", other),
        )),
    }
}
